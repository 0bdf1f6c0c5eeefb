use super::*;

#[test]
fn empty_mailbox_yields_nothing() {
    let mut mb: FrameMailbox<u32> = FrameMailbox::new();
    assert!(mb.is_empty());
    assert_eq!(mb.take(), None);
}

#[test]
fn last_offer_wins() {
    let mut mb = FrameMailbox::new();
    mb.offer(1);
    mb.offer(2);
    mb.offer(3);
    assert_eq!(mb.take(), Some(3));
    assert_eq!(mb.superseded(), 2);
}

#[test]
fn take_empties_the_slot() {
    let mut mb = FrameMailbox::new();
    mb.offer("a");
    assert!(!mb.is_empty());
    assert_eq!(mb.take(), Some("a"));
    assert!(mb.is_empty());
    assert_eq!(mb.take(), None);
}
