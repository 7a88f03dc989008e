use crate::{
    search::shield::{HellingerShield, all_actions, hellinger},
    tree::ids::ActionId,
};

#[test]
fn hellinger_distance_matches_known_values() {
    assert_eq!(hellinger(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
    assert!((hellinger(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-12);

    let expected = (0.5 * ((0.9f64.sqrt() - 0.5f64.sqrt()).powi(2)
        + (0.1f64.sqrt() - 0.5f64.sqrt()).powi(2)))
    .sqrt();
    assert!((hellinger(&[0.9, 0.1], &[0.5, 0.5]) - expected).abs() < 1e-12);
}

#[test]
fn shield_admits_points_near_a_reference() {
    let shield = HellingerShield::new(0.1, vec![vec![0.95, 0.05], vec![0.5, 0.5]]);

    assert!(shield.is_in_threshold(&[0.94, 0.06]));
    assert!(shield.is_in_threshold(&[0.52, 0.48]));
    assert!(!shield.is_in_threshold(&[0.75, 0.25]));

    let distance = shield
        .min_distance(&[0.52, 0.48])
        .expect("shield has points");
    assert!(distance < 0.1);
}

#[test]
fn empty_shield_admits_nothing() {
    let shield = HellingerShield::default();
    assert_eq!(shield.threshold(), 0.1);
    assert!(!shield.is_in_threshold(&[0.5, 0.5]));
    assert_eq!(shield.min_distance(&[0.5, 0.5]), None);
}

#[test]
fn all_actions_lists_every_index() {
    assert_eq!(
        all_actions(3),
        vec![ActionId::from(0), ActionId::from(1), ActionId::from(2)]
    );
    assert!(all_actions(0).is_empty());
}
