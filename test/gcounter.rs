use convergent::{Error, GCounter};

fn counter(replica: u64, initial: u64) -> GCounter<u64, u64> {
    GCounter::with_initial(1, replica, initial)
}

#[test]
fn test_without_increments() {
    let a = GCounter::new(1u64, 1u64);
    assert_eq!(a.value(), 0);
}

#[test]
fn test_increment_by_one() {
    let a = counter(1, 0);
    let before = a.value();
    a.increment().unwrap();
    assert_eq!(a.value() - before, 1);
}

#[test]
fn test_increment_by_delta() {
    let a = counter(1, 0);
    let before = a.value();
    a.increment_by(7).unwrap();
    assert_eq!(a.value() - before, 7);
}

#[test]
fn test_increments_add_up() {
    let a = counter(1, 5);
    for delta in 1..=10 {
        a.increment_by(delta).unwrap();
    }
    assert_eq!(a.value(), 5 + 55);
    assert_eq!(a.local_count(), 60);
}

#[test]
fn test_merge_with_unused_counter() {
    let a = counter(1, 0);
    for _ in 0..10 {
        a.increment().unwrap();
    }
    let b = counter(2, 0);
    let before = a.value();
    a.merge(&b).unwrap();
    assert_eq!(a.value(), before);
}

#[test]
fn test_merge_with_used_counter() {
    let a = counter(1, 0);
    for _ in 0..10 {
        a.increment().unwrap();
    }
    let b = counter(2, 0);
    for _ in 0..7 {
        b.increment().unwrap();
    }
    a.merge(&b).unwrap();
    assert_eq!(a.value(), 17);
}

#[test]
fn test_second_merge() {
    let r1 = counter(1, 10);
    let r2 = counter(2, 7);
    r1.merge(&r2).unwrap();
    assert_eq!(r1.value(), 17);

    for _ in 0..5 {
        r2.increment().unwrap();
    }
    assert_eq!(r2.local_count(), 12);

    r1.merge(&r2).unwrap();
    assert_eq!(r1.value(), 22);
    assert_eq!(r1.local_count(), 10);
}

#[test]
fn test_merge_commutes() {
    let l1 = counter(1, 10);
    let r1 = counter(2, 7);
    l1.merge(&r1).unwrap();

    let l2 = counter(2, 7);
    let r2 = counter(1, 10);
    l2.merge(&r2).unwrap();

    assert_eq!(l1.value(), l2.value());
}

#[test]
fn test_merge_associates() {
    let f1 = counter(1, 10);
    let f2 = counter(2, 7);
    let f3 = counter(3, 5);
    f1.merge(&f2).unwrap();
    f3.merge(&f1).unwrap();

    let s1 = counter(1, 10);
    let s2 = counter(2, 7);
    let s3 = counter(3, 5);
    s2.merge(&s3).unwrap();
    s1.merge(&s2).unwrap();

    assert_eq!(f3.value(), 22);
    assert_eq!(f3.value(), s1.value());
}

#[test]
fn test_merge_is_idempotent() {
    let f1 = counter(1, 10);
    let f2 = counter(2, 7);
    f1.merge(&f2).unwrap();
    let once = f1.value();

    let f2_copy = counter(2, 7);
    f1.merge(&f2_copy).unwrap();
    let with_copy = f1.value();

    f1.merge(&f2).unwrap();
    let twice = f1.value();

    assert_eq!(once, with_copy);
    assert_eq!(with_copy, twice);
}

#[test]
fn test_merge_is_not_reflexive() {
    let f = counter(1, 10);
    assert_eq!(f.merge(&f), Err(Error::SelfMerge));
    assert_eq!(f.value(), 10);

    let s = counter(1, 10);
    let s_updated = counter(1, 12);
    assert_eq!(s.merge(&s_updated), Err(Error::SelfMerge));
    assert_eq!(s.value(), 10);

    let t = counter(1, 10);
    let t_copy = counter(1, 10);
    assert_eq!(t.merge(&t_copy), Err(Error::SelfMerge));
    assert_eq!(t.value(), 10);
}

#[test]
fn test_self_merge_after_peer_merges() {
    let a = counter(1, 3);
    a.merge(&counter(2, 4)).unwrap();
    let before = a.snapshot();

    assert_eq!(a.merge(&a), Err(Error::SelfMerge));
    assert_eq!(a.snapshot(), before);
}

#[test]
fn test_merge_of_different_counters_is_rejected() {
    let a = GCounter::with_initial(1u64, 1u64, 10);
    let b = GCounter::with_initial(2u64, 2u64, 7);
    let before = a.snapshot();

    assert_eq!(a.merge(&b), Err(Error::MismatchedCounter));
    assert_eq!(a.snapshot(), before);
    assert_eq!(a.value(), 10);
}

#[test]
fn test_value_is_monotone_across_merges() {
    let a = counter(1, 2);
    let b = counter(2, 9);
    let c = counter(3, 4);

    let mut last = a.value();
    for peer in [&b, &c, &b].iter() {
        peer.increment().unwrap();
        a.merge(peer).unwrap();
        let now = a.value();
        assert!(now >= last);
        assert!(now >= peer.value());
        last = now;
    }
    assert_eq!(a.value(), 2 + 11 + 5);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::MismatchedCounter.to_string(),
        "cannot merge states of different logical counters"
    );
    assert_eq!(
        Error::SelfMerge.to_string(),
        "cannot merge a state carrying this replica's own id"
    );
    assert_eq!(Error::Overflow.to_string(), "counter overflowed u64");
}
