//! End-to-end flow over the in-memory store: two ward parties grow, pick
//! leaders, merge, ally with a third, support and escalate an issue.

use openpolitics_service::{CivicService, MemoryStore, PartyFilter};
use openpolitics_types::{PartyId, UserId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn grown_party(
    svc: &CivicService<MemoryStore>,
    issue: &str,
    members: usize,
) -> (PartyId, UserId) {
    let leader = UserId::generate();
    let party = svc
        .create_party(&leader, issue, vec!["560001".into()])
        .await
        .unwrap();
    for _ in 1..members {
        svc.join_party(&party.id, &UserId::generate()).await.unwrap();
    }
    svc.cast_trust_vote(&party.id, &leader, &leader)
        .await
        .unwrap();
    (party.id, leader)
}

#[tokio::test]
async fn test_full_civic_lifecycle() {
    init_tracing();
    let svc = CivicService::new(MemoryStore::new());

    let (ward, ward_leader) = grown_party(&svc, "Fix the ward drainage", 5).await;
    let (city, city_leader) = grown_party(&svc, "City storm-water plan", 3).await;
    let (green, _) = grown_party(&svc, "More parks", 2).await;

    // Ward rolls up into the city party.
    svc.merge_party(&ward, &city, &ward_leader).await.unwrap();
    let status = svc.merge_status(&city).await.unwrap();
    assert_eq!(status.total_members, 8);

    // The merged pair's parent allies with the parks party.
    let roster = svc
        .create_alliance(
            &city_leader,
            Some("Livable City".into()),
            vec![city.clone(), green.clone()],
        )
        .await
        .unwrap();
    assert_eq!(roster.members.len(), 2);

    // The city leader supports the ward's issue, then escalates their own.
    svc.support_party(&city, &ward, &city_leader).await.unwrap();
    svc.escalate(&ward, &city, &ward_leader).await.unwrap();

    let supports = svc.supports_for(&ward).await.unwrap();
    assert_eq!(supports.len(), 1);
    assert!(!supports[0].is_revoked);

    let trail = svc.escalation_trail(&ward).await.unwrap();
    assert_eq!(trail.len(), 2);
    assert!(trail[0].escalated_at.is_none());
    assert_eq!(trail[1].party.id, city);

    // Listing sees all three parties in the shared pincode.
    let listed = svc
        .list_parties(&PartyFilter::new().with_pincode("560001"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn test_views_serialize_for_the_api_layer() {
    init_tracing();
    let svc = CivicService::new(MemoryStore::new());

    let (ward, leader) = grown_party(&svc, "Fix the ward drainage", 4).await;
    svc.like_party(&ward, &UserId::generate()).await.unwrap();
    svc.ask_question(&ward, None, "What is the timeline?")
        .await
        .unwrap();

    let stats = svc.party_stats(&ward).await.unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["member_count"], 4);
    assert_eq!(json["level"], 1);
    assert_eq!(json["like_count"], 1);
    assert_eq!(json["unanswered_questions"], 1);
    assert_eq!(json["leader"], serde_json::json!(leader.0));

    let status = svc.merge_status(&ward).await.unwrap();
    let json = serde_json::to_value(&status).unwrap();
    assert!(json["current"].is_null());
    assert_eq!(json["breakdown"][0]["is_self"], true);
}
