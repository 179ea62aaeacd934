use revgeo::loader::read_places;
use revgeo::{CountryNameTable, Error, IndexConfig, PointRecord, PointStore, ReverseGeocoder};

const PLACES: &str = "\
5128581\tNew York\tNew York\t\t40.7128\t-74.0060\tP\tPPLA2\tUS\t\t\t\t\t\t8804190\t\t10\tAmerica/New_York\t2024-01-01
2643743\tLondon\tLondon\t\t51.5074\t-0.1278\tP\tPPLC\tGB\t\t\t\t\t\t8961989\t\t25\tEurope/London\t2024-01-01
1850147\tTokyo\tTokyo\t\t35.6762\t139.6503\tP\tPPLC\tJP\t\t\t\t\t\t8336599\t\t44\tAsia/Tokyo\t2024-01-01
";

const COUNTRY_INFO: &str = "\
#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital
US\tUSA\t840\tUS\tUnited States\tWashington

GB\tGBR\t826\tUK\tUnited Kingdom\tLondon
";

fn geocoder() -> ReverseGeocoder {
    let (store, summary) = read_places(PLACES.as_bytes()).unwrap();
    assert_eq!(summary.loaded, 3);
    let countries = CountryNameTable::from_reader(COUNTRY_INFO.as_bytes()).unwrap();
    ReverseGeocoder::new(store, countries, IndexConfig::default()).unwrap()
}

#[test]
fn three_city_scenario() {
    let geocoder = geocoder();

    let ny = geocoder.lookup(40.73, -73.99).unwrap();
    assert_eq!(ny.place, "New York");
    assert_eq!(ny.country_code, "US");
    assert_eq!(ny.country, "United States");

    let london = geocoder.lookup(51.50, -0.12).unwrap();
    assert_eq!(london.place, "London");
    assert_eq!(london.country_code, "GB");
    assert_eq!(london.country, "United Kingdom");

    // JP is missing from the country table
    let tokyo = geocoder.lookup(35.0, 139.0).unwrap();
    assert_eq!(tokyo.place, "Tokyo");
    assert_eq!(tokyo.country, "JP");
}

#[test]
fn response_serializes_to_wire_shape() {
    let place = geocoder().lookup(51.50, -0.12).unwrap();
    let json = serde_json::to_value(&place).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "place": "London",
            "countryCode": "GB",
            "country": "United Kingdom",
        })
    );
}

#[test]
fn poles_and_antimeridian() {
    let geocoder = geocoder();
    for (lat, lon) in [(90.0, 0.0), (-90.0, 0.0), (0.0, 180.0), (0.0, -180.0), (45.0, 540.0)] {
        assert!(geocoder.lookup(lat, lon).is_ok(), "lookup failed at ({}, {})", lat, lon);
    }
    // the north pole is closest to London (51.5N) of the three
    assert_eq!(geocoder.lookup(90.0, 0.0).unwrap().place, "London");
    // 180 and -180 are the same meridian
    assert_eq!(
        geocoder.lookup(10.0, 180.0).unwrap(),
        geocoder.lookup(10.0, -180.0).unwrap()
    );
}

#[test]
fn antimeridian_neighbours_are_found_across_the_seam() {
    let store = PointStore::new(vec![
        PointRecord::from_degrees(-17.7134, 178.0650, "Suva", Some("FJ")),
        PointRecord::from_degrees(-13.8333, -171.7667, "Apia", Some("WS")),
        PointRecord::from_degrees(21.3069, -157.8583, "Honolulu", Some("US")),
    ]);
    let geocoder =
        ReverseGeocoder::new(store, CountryNameTable::default(), IndexConfig::default()).unwrap();

    // just east of the antimeridian, but Suva is still the closest
    assert_eq!(geocoder.lookup(-17.0, -179.5).unwrap().place, "Suva");
    assert_eq!(geocoder.lookup(-14.0, -172.5).unwrap().place, "Apia");
}

#[test]
fn empty_data_is_a_distinct_failure() {
    let (store, _) = read_places("not\ta\tplace\n".as_bytes()).unwrap();
    assert!(store.is_empty());
    let err = ReverseGeocoder::new(store, CountryNameTable::default(), IndexConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::EmptyIndex));

    let unpopulated = ReverseGeocoder::default();
    assert!(matches!(unpopulated.lookup(40.73, -73.99), Err(Error::EmptyIndex)));
}
