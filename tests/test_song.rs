//! Tests for canonical song normalization and comparison semantics

use songport::song::{
    decode_rating_token, Field, Operand, Song, SongError, JSON_STORE_FIELDS, XML_LIBRARY_FIELDS,
};

mod common;

use common::*;

#[test]
fn test_construction_leaves_no_foreign_names() {
    let record = foreign(&[
        ("Name", "Blue Train"),
        ("Artist", "John Coltrane"),
        ("Location", "file:///music/blue_train.mp3"),
        ("Play Count", "12"),
        ("Track ID", "1001"),
        ("Persistent ID", "ABCDEF0123456789"),
        ("Kind", "MPEG audio file"),
    ]);

    let song = Song::from_foreign(&record, &XML_LIBRARY_FIELDS).unwrap();

    // Every key went through the table exactly once: mapped keys landed on
    // canonical fields, unmapped keys vanished.
    assert_eq!(song.played_count, Some(12));
    let serialized = serde_json::to_value(&song).unwrap();
    let keys: Vec<&str> = serialized
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["Play Count", "Track ID", "Persistent ID", "Kind"] {
        assert!(!keys.contains(&key), "foreign key '{}' survived", key);
    }
    for key in keys {
        assert!(
            Field::parse(key).is_some() || key == "date_added_raw",
            "unexpected field '{}' on serialized song",
            key
        );
    }
}

#[test]
fn test_required_fields_enforced_per_table() {
    let record = foreign(&[("name", "A"), ("artist", "X")]);
    let err = Song::from_foreign(&record, &JSON_STORE_FIELDS).unwrap_err();
    assert!(matches!(
        err,
        SongError::MissingField {
            field: Field::Location
        }
    ));

    // Whitespace-only required values count as missing
    let record = foreign(&[("name", "A"), ("artist", "   "), ("location", "/a.mp3")]);
    let err = Song::from_foreign(&record, &JSON_STORE_FIELDS).unwrap_err();
    assert!(matches!(
        err,
        SongError::MissingField {
            field: Field::Artist
        }
    ));
}

#[test]
fn test_rating_token_comparison_matches_decoded_value() {
    // Comparison against a token is equivalent to comparing star counts
    // against the token's decoded numeric value.
    for (token, stars) in [("⭐⭐⭐", 3u8), ("4 stars", 4), ("1 star", 1)] {
        assert_eq!(decode_rating_token(token), Some(stars));

        let mut subject = song("A", "X", None, None);
        subject.rating = Some(stars * 20);
        assert!(subject.matches(&Operand::Stars(stars)));
        assert!(subject.at_least(&Operand::Stars(stars)));
        assert!(!subject.below(&Operand::Stars(stars)));

        subject.rating = Some(stars * 20 - 20);
        assert!(subject.below(&Operand::Stars(stars)));
    }
}

#[test]
fn test_mixed_operand_query() {
    // "rated at least 3 stars and released before 2022"
    let mut subject = song("A", "X", Some(1998), Some(80));
    assert!(subject.at_least(&Operand::parse("3 stars").unwrap()));
    assert!(subject.below(&Operand::parse("2022").unwrap()));

    subject.rating = Some(20);
    assert!(!subject.at_least(&Operand::parse("3 stars").unwrap()));
}

#[test]
fn test_cmp_by_rating_is_a_strict_weak_order() {
    let songs = [
        song("A", "X", None, Some(80)),
        song("B", "Y", None, Some(40)),
        song("C", "Y", None, Some(40)),
        song("D", "Z", None, None),
        song("A", "Z", None, Some(80)),
    ];

    // Transitivity over every triple
    for a in &songs {
        for b in &songs {
            for c in &songs {
                if a.cmp_by_rating(b).is_lt() && b.cmp_by_rating(c).is_lt() {
                    assert!(
                        a.cmp_by_rating(c).is_lt(),
                        "transitivity violated for {} {} {}",
                        a.name,
                        b.name,
                        c.name
                    );
                }
            }
        }
    }

    // Antisymmetry of the derived ordering
    for a in &songs {
        for b in &songs {
            assert_eq!(a.cmp_by_rating(b), b.cmp_by_rating(a).reverse());
        }
    }

    // Ties break on name
    let b = &songs[1];
    let c = &songs[2];
    assert!(b.cmp_by_rating(c).is_lt());
}

#[test]
fn test_same_track_is_reflexive_and_symmetric() {
    let a = song("Blue Train", "John Coltrane", Some(1958), Some(80));
    let b = song("BLUE  TRAIN", "john coltrane", None, None);
    let c = song("Blue Train", "Miles Davis", None, None);

    assert!(a.same_track(&a));
    assert!(a.same_track(&b) && b.same_track(&a));
    assert!(!a.same_track(&c) && !c.same_track(&a));
}

#[test]
fn test_structural_equality_is_distinct_from_same_track() {
    let a = song("Blue Train", "John Coltrane", Some(1958), Some(80));
    let b = song("blue train", "JOHN COLTRANE", None, None);
    assert!(a.same_track(&b));
    assert_ne!(a, b);
}

#[test]
fn test_json_family_date_grammar() {
    let record = foreign(&[
        ("name", "A"),
        ("artist", "X"),
        ("location", "/a.mp3"),
        ("date_added", "2021-06-15T08:30:00"),
    ]);
    let song = Song::from_foreign(&record, &JSON_STORE_FIELDS).unwrap();
    let date = song.date_added.unwrap();
    assert_eq!(date.format("%Y-%m-%d %H:%M").to_string(), "2021-06-15 08:30");
    assert_eq!(song.date_added_raw.as_deref(), Some("2021-06-15T08:30:00"));
}

#[test]
fn test_clear_field_refuses_required_fields() {
    let mut subject = song("A", "X", Some(1998), Some(80));
    assert!(!subject.clear_field(Field::Name));
    assert_eq!(subject.name, "A");

    assert!(subject.clear_field(Field::Rating));
    assert_eq!(subject.rating, None);
    assert!(subject.field_is_empty(Field::Rating));
    assert!(!subject.field_is_empty(Field::Name));
}
