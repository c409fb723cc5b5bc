use std::fs;

use anime_defence_profile::{Profile, ProfileStore, STARTING_YEN};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn progress_survives_a_save_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ProfileStore::new(dir.path());
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut profile = Profile::new(&mut rng);
    profile.gain_yen(1_000);
    let _ = profile.gain_xp(1_200);
    let rolled = profile.roll_unit(&mut rng).expect("rolled").id;
    profile.select_unit(rolled).expect("selected");
    store.save(&profile).expect("saved");

    let restored = store.load_or_new(&mut rng);
    assert_eq!(restored, profile);
    assert_eq!(restored.selected_unit().map(|unit| unit.id), Some(rolled));
}

#[test]
fn corrupt_save_falls_back_to_fresh_profile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ProfileStore::new(dir.path());
    fs::write(store.path(), "][").expect("write");

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let profile = store.load_or_new(&mut rng);
    assert_eq!(profile.level(), 1);
    assert_eq!(profile.yen(), STARTING_YEN);
    assert_eq!(profile.inventory().len(), 1);
}

#[test]
fn partial_record_keeps_defaults_for_missing_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ProfileStore::new(dir.path());
    fs::write(store.path(), r#"{ "player": { "yen": 9000, "level": 3 } }"#).expect("write");

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let profile = store.load_or_new(&mut rng);
    assert_eq!(profile.yen(), 9_000);
    assert_eq!(profile.level(), 3);
    assert_eq!(profile.xp(), 0);
    assert_eq!(profile.inventory().len(), 1, "starter unit granted");
}
