use crate::models::Coordinate;

/// Centroids of the larger Hungarian cities
const CITY_CENTROIDS: &[(&str, f64, f64)] = &[
    ("Budapest", 47.4979, 19.0402),
    ("Debrecen", 47.5316, 21.6273),
    ("Szeged", 46.2530, 20.1414),
    ("Miskolc", 48.1035, 20.7784),
    ("Pécs", 46.0727, 18.2323),
    ("Győr", 47.6875, 17.6504),
    ("Nyíregyháza", 47.9554, 21.7167),
    ("Kecskemét", 46.8964, 19.6897),
    ("Székesfehérvár", 47.1860, 18.4221),
    ("Szombathely", 47.2307, 16.6218),
    ("Szolnok", 47.1621, 20.1825),
    ("Tatabánya", 47.5692, 18.4048),
    ("Kaposvár", 46.3594, 17.7968),
    ("Érd", 47.3949, 18.9136),
    ("Veszprém", 47.0933, 17.9115),
    ("Békéscsaba", 46.6736, 21.0877),
    ("Zalaegerszeg", 46.8417, 16.8416),
    ("Sopron", 47.6817, 16.5845),
    ("Eger", 47.9025, 20.3772),
    ("Nagykanizsa", 46.4590, 16.9897),
    ("Dunaújváros", 46.9619, 18.9355),
    ("Hódmezővásárhely", 46.4181, 20.3300),
    ("Szekszárd", 46.3474, 18.7062),
    ("Salgótarján", 48.0935, 19.7999),
    ("Vác", 47.7784, 19.1332),
    ("Gödöllő", 47.5962, 19.3553),
    ("Esztergom", 47.7928, 18.7409),
];

/// Look up a city centroid by name, ignoring case and surrounding spaces
pub fn lookup(city: &str) -> Option<Coordinate> {
    let wanted = city.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    CITY_CENTROIDS
        .iter()
        .find(|(name, _, _)| name.to_lowercase() == wanted)
        .map(|(_, lat, lng)| Coordinate::new(*lat, *lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_known_cities() {
        let pecs = lookup(" PÉCS ").unwrap();
        assert_eq!(pecs, Coordinate::new(46.0727, 18.2323));
        assert!(lookup("Debrecen").is_some());
    }

    #[test]
    fn unknown_or_blank_is_none() {
        assert!(lookup("Kisvárda-alsó").is_none());
        assert!(lookup("").is_none());
    }
}
