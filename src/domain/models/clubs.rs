//! Built-in club catalog.
//!
//! The portal has no public endpoint for enumerating clubs, so the known
//! network is shipped as a static table. Ids are the portal's club ids.
//! The list is not exhaustive; filters accept any id, and unknown clubs
//! simply display without a catalog name.

/// One known club.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Club {
    /// Portal club id.
    pub id: i64,
    /// Club display name.
    pub name: &'static str,
    /// City the club is in.
    pub city: &'static str,
}

/// Known clubs, grouped by city, Warsaw first.
pub const CLUBS: &[Club] = &[
    Club { id: 7, name: "Zdrofit Bemowo Dywizjonu 303", city: "Warszawa" },
    Club { id: 248, name: "Zdrofit Bemowo Warszawska", city: "Warszawa" },
    Club { id: 95, name: "Zdrofit Bemowo Świetlików", city: "Warszawa" },
    Club { id: 75, name: "Zdrofit Lazurowa", city: "Warszawa" },
    Club { id: 140, name: "Zdrofit Białołęka Modlińska", city: "Warszawa" },
    Club { id: 45, name: "Zdrofit Tarchomin Galeria Północna", city: "Warszawa" },
    Club { id: 9, name: "Zdrofit Bielany Marymoncka", city: "Warszawa" },
    Club { id: 46, name: "Zdrofit Bielany Przy Agorze", city: "Warszawa" },
    Club { id: 60, name: "Zdrofit Galeria Młociny", city: "Warszawa" },
    Club { id: 25, name: "Zdrofit Centrum Krucza", city: "Warszawa" },
    Club { id: 66, name: "Zdrofit Centrum Rondo ONZ", city: "Warszawa" },
    Club { id: 72, name: "Zdrofit The Warsaw HUB", city: "Warszawa" },
    Club { id: 70, name: "Zdrofit Varso", city: "Warszawa" },
    Club { id: 40, name: "Zdrofit Śródmieście Metro Politechnika", city: "Warszawa" },
    Club { id: 2, name: "Zdrofit Gocław Ostrobramska", city: "Warszawa" },
    Club { id: 4, name: "Zdrofit Mokotów Bukowińska", city: "Warszawa" },
    Club { id: 10, name: "Zdrofit Mokotów Konstruktorska", city: "Warszawa" },
    Club { id: 44, name: "Zdrofit Mokotów Warszawianka", city: "Warszawa" },
    Club { id: 54, name: "Zdrofit Mokotów Westfield Mokotów", city: "Warszawa" },
    Club { id: 31, name: "Zdrofit Gdańsk Alchemia", city: "Gdańsk" },
    Club { id: 35, name: "Zdrofit Gdańsk Chełm", city: "Gdańsk" },
    Club { id: 85, name: "Zdrofit Gdańsk Morena", city: "Gdańsk" },
    Club { id: 37, name: "Zdrofit Gdynia CH Riviera", city: "Gdynia" },
    Club { id: 76, name: "Zdrofit Gdynia Plac Kaszubski", city: "Gdynia" },
    Club { id: 39, name: "Zdrofit Sopot Sopot Centrum", city: "Sopot" },
    Club { id: 86, name: "Zdrofit Szczecin Galaxy", city: "Szczecin" },
    Club { id: 87, name: "Zdrofit Szczecin Kaskada", city: "Szczecin" },
    Club { id: 97, name: "Zdrofit Toruń Rydygiera", city: "Toruń" },
    Club { id: 169, name: "Zdrofit Lublin Batory", city: "Lublin" },
    Club { id: 94, name: "Zdrofit Białystok Wrocławska", city: "Białystok" },
    Club { id: 1, name: "Zdrofit Legionowo DH Maxim", city: "Legionowo" },
    Club { id: 53, name: "Zdrofit Piaseczno Pawia", city: "Piaseczno" },
    Club { id: 42, name: "Zdrofit Pruszków CH Nowa Stacja", city: "Pruszków" },
    Club { id: 21, name: "Zdrofit Płock Mazovia", city: "Płock" },
    Club { id: 26, name: "Zdrofit Kielce Galeria Echo", city: "Kielce" },
];

/// Look up a club's display name by id.
pub fn club_name(id: i64) -> Option<&'static str> {
    CLUBS.iter().find(|c| c.id == id).map(|c| c.name)
}
