//! Small built-in gazetteer used to complete partially extracted records.
//!
//! Lookups are case-insensitive and exact on the whole name.

/// Country names recognised in free text.
pub static COUNTRIES: &[&str] = &[
    "Argentina",
    "Australia",
    "Austria",
    "Belgium",
    "Brazil",
    "Cambodia",
    "Canada",
    "Chile",
    "China",
    "Colombia",
    "Croatia",
    "Czech Republic",
    "Denmark",
    "Egypt",
    "England",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "India",
    "Indonesia",
    "Ireland",
    "Israel",
    "Italy",
    "Japan",
    "Jordan",
    "Kenya",
    "Laos",
    "Malaysia",
    "Mexico",
    "Morocco",
    "Myanmar",
    "Nepal",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Peru",
    "Philippines",
    "Poland",
    "Portugal",
    "Russia",
    "Scotland",
    "Singapore",
    "South Africa",
    "South Korea",
    "Spain",
    "Sweden",
    "Switzerland",
    "Taiwan",
    "Tanzania",
    "Thailand",
    "Turkey",
    "United Arab Emirates",
    "United Kingdom",
    "United States",
    "Vietnam",
];

/// City → country.
pub static CITIES: &[(&str, &str)] = &[
    ("Amsterdam", "Netherlands"),
    ("Athens", "Greece"),
    ("Bangkok", "Thailand"),
    ("Barcelona", "Spain"),
    ("Beijing", "China"),
    ("Berlin", "Germany"),
    ("Buenos Aires", "Argentina"),
    ("Cairo", "Egypt"),
    ("Cape Town", "South Africa"),
    ("Chiang Mai", "Thailand"),
    ("Chiang Rai", "Thailand"),
    ("Copenhagen", "Denmark"),
    ("Cusco", "Peru"),
    ("Delhi", "India"),
    ("Dubai", "United Arab Emirates"),
    ("Dublin", "Ireland"),
    ("Edinburgh", "United Kingdom"),
    ("Florence", "Italy"),
    ("Hanoi", "Vietnam"),
    ("Ho Chi Minh City", "Vietnam"),
    ("Hong Kong", "China"),
    ("Istanbul", "Turkey"),
    ("Jakarta", "Indonesia"),
    ("Kathmandu", "Nepal"),
    ("Kyoto", "Japan"),
    ("Lisbon", "Portugal"),
    ("London", "United Kingdom"),
    ("Los Angeles", "United States"),
    ("Luang Prabang", "Laos"),
    ("Madrid", "Spain"),
    ("Marrakech", "Morocco"),
    ("Melbourne", "Australia"),
    ("Mexico City", "Mexico"),
    ("Milan", "Italy"),
    ("Milano", "Italy"),
    ("Moscow", "Russia"),
    ("Mumbai", "India"),
    ("Munich", "Germany"),
    ("Naples", "Italy"),
    ("New York", "United States"),
    ("Osaka", "Japan"),
    ("Oslo", "Norway"),
    ("Paris", "France"),
    ("Phuket", "Thailand"),
    ("Prague", "Czech Republic"),
    ("Reykjavik", "Iceland"),
    ("Rio De Janeiro", "Brazil"),
    ("Roma", "Italy"),
    ("Rome", "Italy"),
    ("San Francisco", "United States"),
    ("Seoul", "South Korea"),
    ("Siem Reap", "Cambodia"),
    ("Singapore", "Singapore"),
    ("Stockholm", "Sweden"),
    ("Sydney", "Australia"),
    ("Taipei", "Taiwan"),
    ("Tokyo", "Japan"),
    ("Toronto", "Canada"),
    ("Venice", "Italy"),
    ("Vienna", "Austria"),
    ("Washington", "United States"),
    ("Yangon", "Myanmar"),
    ("Zurich", "Switzerland"),
];

/// Landmark → (city, country).
pub static LANDMARKS: &[(&str, &str, &str)] = &[
    ("Acropolis", "Athens", "Greece"),
    ("Angkor Wat", "Siem Reap", "Cambodia"),
    ("Big Ben", "London", "United Kingdom"),
    ("Brandenburg Gate", "Berlin", "Germany"),
    ("Burj Khalifa", "Dubai", "United Arab Emirates"),
    ("Colosseum", "Rome", "Italy"),
    ("Doi Kham", "Chiang Mai", "Thailand"),
    ("Doi Suthep", "Chiang Mai", "Thailand"),
    ("Eiffel Tower", "Paris", "France"),
    ("Fushimi Inari", "Kyoto", "Japan"),
    ("Golden Gate Bridge", "San Francisco", "United States"),
    ("Grand Palace", "Bangkok", "Thailand"),
    ("Hagia Sophia", "Istanbul", "Turkey"),
    ("Louvre", "Paris", "France"),
    ("Machu Picchu", "Cusco", "Peru"),
    ("Notre Dame", "Paris", "France"),
    ("Pantheon", "Rome", "Italy"),
    ("Sagrada Familia", "Barcelona", "Spain"),
    ("Shwedagon Pagoda", "Yangon", "Myanmar"),
    ("Statue Of Liberty", "New York", "United States"),
    ("Sydney Opera House", "Sydney", "Australia"),
    ("Taj Mahal", "Agra", "India"),
    ("Tower Bridge", "London", "United Kingdom"),
    ("Trevi Fountain", "Rome", "Italy"),
    ("Wat Arun", "Bangkok", "Thailand"),
];

/// Country for a known city.
pub fn country_of_city(city: &str) -> Option<&'static str> {
    CITIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city.trim()))
        .map(|(_, country)| *country)
}

/// City and country for a known landmark.
pub fn landmark(name: &str) -> Option<(&'static str, &'static str)> {
    LANDMARKS
        .iter()
        .find(|(landmark, _, _)| landmark.eq_ignore_ascii_case(name.trim()))
        .map(|(_, city, country)| (*city, *country))
}

/// Whether `name` is a known country.
pub fn is_country(name: &str) -> bool {
    COUNTRIES.iter().any(|c| c.eq_ignore_ascii_case(name.trim()))
}
