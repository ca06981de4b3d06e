use super::*;

#[tokio::test]
async fn subscribers_receive_published_searches() {
    let events = SearchEvents::default();
    let mut rx = events.subscribe();

    assert_eq!(events.publish(HeroSearch::new("Ikeja")), 1);
    assert_eq!(rx.recv().await.unwrap(), HeroSearch::new("Ikeja"));
}

#[test]
fn publishing_without_listeners_is_harmless() {
    let events = SearchEvents::new(0);
    assert_eq!(events.publish(HeroSearch::new("Abuja")), 0);
}
