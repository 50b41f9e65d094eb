mod common;

use common::*;
use futures_util::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use vote_giveaway_backend::entities::{VoteState, voter_entity as voters};
use vote_giveaway_backend::error::AppError;
use vote_giveaway_backend::models::*;

#[tokio::test]
async fn test_participant_unique_per_giveaway() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;

    let first = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();
    let second = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await;

    match second {
        Err(AppError::Duplicate { existing_id, .. }) => {
            assert_eq!(existing_id.as_deref(), Some(first.id.as_str()))
        }
        other => panic!("expected duplicate, got {other:?}"),
    }

    let count = app
        .participants
        .get_participants_count(&giveaway_id, 10)
        .await
        .unwrap();
    assert_eq!(count.count, 1);
    assert_eq!(count.id.as_deref(), Some(first.id.as_str()));
}

#[tokio::test]
async fn test_concurrent_participation_keeps_one_row() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let who = user(20);

    let attempts = (0..5).map(|_| app.participants.add_participant(&giveaway_id, &who, None));
    let results = join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AppError::Duplicate { .. }))
    );

    let count = app
        .participants
        .get_participants_count(&giveaway_id, 20)
        .await
        .unwrap();
    assert_eq!(count.count, 1);
}

#[tokio::test]
async fn test_same_user_may_join_different_giveaways() {
    let app = setup().await;
    let a = create_ongoing(&app, 1).await;
    let b = create_ongoing(&app, 1).await;

    assert!(app.participants.add_participant(&a, &user(30), None).await.is_ok());
    assert!(app.participants.add_participant(&b, &user(30), None).await.is_ok());
}

#[tokio::test]
async fn test_vote_three_way_branch() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let target = app
        .participants
        .add_participant(&giveaway_id, &user(10), Some(100))
        .await
        .unwrap();
    let voter = user(99);

    let (created, outcome) = app
        .voters
        .add_vote(&giveaway_id, &target.id, &voter, Some(500))
        .await
        .unwrap();
    assert_eq!(outcome, VoteOutcome::Created);
    assert_eq!(created.state, VoteState::Active);

    let again = app
        .voters
        .add_vote(&giveaway_id, &target.id, &voter, None)
        .await;
    match again {
        Err(AppError::Duplicate { existing_id, .. }) => {
            assert_eq!(existing_id.as_deref(), Some(created.id.as_str()))
        }
        other => panic!("expected duplicate, got {other:?}"),
    }

    app.voters.invalidate_vote(&created.id).await.unwrap();
    let (revived, outcome) = app
        .voters
        .add_vote(&giveaway_id, &target.id, &voter, Some(900))
        .await
        .unwrap();
    assert_eq!(outcome, VoteOutcome::Reactivated);
    assert_eq!(revived.id, created.id);
    assert_eq!(revived.voted_on, 500);
}

#[tokio::test]
async fn test_invalidate_then_revote_keeps_single_row() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();
    let voter = user(77);

    let (original, _) = app
        .voters
        .add_vote(&giveaway_id, &p1.id, &voter, Some(1_000))
        .await
        .unwrap();

    for _ in 0..3 {
        let invalidated = app.voters.invalidate_vote(&original.id).await.unwrap();
        assert_eq!(invalidated.state, VoteState::Invalidated);
        assert!(
            !app.voters
                .has_active_vote(&giveaway_id, &p1.id, voter.id)
                .await
                .unwrap()
        );

        app.voters
            .add_vote(&giveaway_id, &p1.id, &voter, None)
            .await
            .unwrap();
    }

    let rows = voters::Entity::find()
        .filter(voters::Column::GiveawayId.eq(giveaway_id.clone()))
        .filter(voters::Column::ParticipantId.eq(p1.id.clone()))
        .filter(voters::Column::VoterUserId.eq(voter.id))
        .all(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].state, VoteState::Active);
    assert_eq!(rows[0].voted_on, 1_000);
}

#[tokio::test]
async fn test_invalidate_is_idempotent_and_checks_existence() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();
    let (vote, _) = app
        .voters
        .add_vote(&giveaway_id, &p1.id, &user(50), None)
        .await
        .unwrap();

    app.voters.invalidate_vote(&vote.id).await.unwrap();
    let again = app.voters.invalidate_vote(&vote.id).await.unwrap();
    assert_eq!(again.state, VoteState::Invalidated);

    assert!(matches!(
        app.voters.invalidate_vote("missing").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_votes_keep_one_active_row() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();
    let voter = user(60);

    let attempts = (0..4).map(|_| app.voters.add_vote(&giveaway_id, &p1.id, &voter, None));
    let results = join_all(attempts).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let active = voters::Entity::find()
        .filter(voters::Column::ParticipantId.eq(p1.id.clone()))
        .filter(voters::Column::State.eq(VoteState::Active))
        .count(&app.pool)
        .await
        .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_voters_list_excludes_invalidated_and_sorts_recent_first() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();

    app.voters
        .add_vote(&giveaway_id, &p1.id, &user(101), Some(100))
        .await
        .unwrap();
    let (second, _) = app
        .voters
        .add_vote(&giveaway_id, &p1.id, &user(102), Some(300))
        .await
        .unwrap();
    let (third, _) = app
        .voters
        .add_vote(&giveaway_id, &p1.id, &user(103), Some(200))
        .await
        .unwrap();
    app.voters.invalidate_vote(&third.id).await.unwrap();

    let list = app
        .voters
        .list_participant_voters(&p1.id, 101)
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, second.id);
    assert_eq!(list[0].name, "User102");
    assert!(!list[0].is_viewer);
    assert!(list[1].is_viewer);
}

#[tokio::test]
async fn test_participate_gated_by_membership() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;

    let rejected = app.participants.participate(&giveaway_id, &user(10)).await;
    assert!(matches!(
        rejected,
        Err(AppError::RequirementNotMet(RequirementKind::ChatMember))
    ));

    app.telegram.join(MAIN_CHAT, 10);
    let joined = app
        .participants
        .participate(&giveaway_id, &user(10))
        .await
        .unwrap();
    assert_eq!(joined.user.id, 10);
}

#[tokio::test]
async fn test_participate_requires_system_channel_when_enabled() {
    let app = setup_with_system_channel(Some(system_chat())).await;
    let giveaway_id = create_ongoing(&app, 1).await;
    app.telegram.join(MAIN_CHAT, 10);

    assert!(matches!(
        app.participants.participate(&giveaway_id, &user(10)).await,
        Err(AppError::RequirementNotMet(RequirementKind::ChatMember))
    ));

    app.telegram.join(SYSTEM_CHAT, 10);
    assert!(app.participants.participate(&giveaway_id, &user(10)).await.is_ok());
}

#[tokio::test]
async fn test_provider_failure_fails_closed() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;
    app.telegram.join(MAIN_CHAT, 10);
    app.telegram.break_chat(MAIN_CHAT);

    assert!(matches!(
        app.participants.participate(&giveaway_id, &user(10)).await,
        Err(AppError::RequirementNotMet(RequirementKind::ChatMember))
    ));

    let recheck = app
        .giveaways
        .check_requirements(
            &giveaway_id,
            &RequirementCheckRequest {
                scope: RequirementScope::Participation,
                user: user(10),
            },
        )
        .await
        .unwrap();
    assert!(!recheck.satisfied);
    let checks = recheck.report.chat_member.unwrap();
    assert_eq!(checks[0].status, CheckStatus::Unavailable);
}

#[tokio::test]
async fn test_vote_gated_by_boost_and_premium() {
    let app = setup().await;
    let mut req = ongoing_request(1);
    req.voting_requirements = Some(RequirementSet {
        chat_member: true,
        premium_user: true,
        chat_booster: true,
    });
    let giveaway_id = app.giveaways.create_giveaway(req).await.unwrap().giveaway.id;
    let target = app
        .participants
        .add_participant(&giveaway_id, &user(10), None)
        .await
        .unwrap();

    let mut voter = user(40);
    app.telegram.join(MAIN_CHAT, voter.id);
    assert!(matches!(
        app.voters.vote(&target.id, &voter).await,
        Err(AppError::RequirementNotMet(RequirementKind::PremiumUser))
    ));

    voter.is_premium = true;
    assert!(matches!(
        app.voters.vote(&target.id, &voter).await,
        Err(AppError::RequirementNotMet(RequirementKind::ChatBooster))
    ));

    app.telegram.boost(MAIN_CHAT, voter.id);
    let response = app.voters.vote(&target.id, &voter).await.unwrap();
    assert_eq!(response.outcome, VoteOutcome::Created);
    assert!(!response.voter.is_invalid);
}

#[tokio::test]
async fn test_actions_rejected_outside_active_window() {
    let app = setup().await;

    let mut upcoming = ongoing_request(1);
    upcoming.start_time = now() + 3600;
    upcoming.end_time = now() + 7200;
    let upcoming_id = app.giveaways.create_giveaway(upcoming).await.unwrap().giveaway.id;

    let mut ended = ongoing_request(1);
    ended.start_time = now() - 7200;
    ended.end_time = now() - 3600;
    let ended_id = app.giveaways.create_giveaway(ended).await.unwrap().giveaway.id;

    app.telegram.join(MAIN_CHAT, 10);
    assert!(matches!(
        app.participants.participate(&upcoming_id, &user(10)).await,
        Err(AppError::GiveawayNotActive(GiveawayStatus::Upcoming))
    ));
    assert!(matches!(
        app.participants.participate(&ended_id, &user(10)).await,
        Err(AppError::GiveawayNotActive(GiveawayStatus::Ended))
    ));

    let target = app
        .participants
        .add_participant(&ended_id, &user(11), None)
        .await
        .unwrap();
    app.telegram.join(MAIN_CHAT, 12);
    assert!(matches!(
        app.voters.vote(&target.id, &user(12)).await,
        Err(AppError::GiveawayNotActive(GiveawayStatus::Ended))
    ));
}

#[tokio::test]
async fn test_create_giveaway_notifies_creator() {
    let app = setup_with_system_channel(Some(system_chat())).await;
    let created = app
        .giveaways
        .create_giveaway(ongoing_request(2))
        .await
        .unwrap();

    assert!(created.notified);
    assert_eq!(
        created.participation_link,
        format!(
            "https://t.me/VoteGiveawayBot/giveaway?startapp={}",
            created.giveaway.id
        )
    );
    let sent = app.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 1);
    assert!(sent[0].1.contains(&created.participation_link));

    let loaded = app.giveaways.get_giveaway(&created.giveaway.id).await.unwrap();
    assert_eq!(loaded.status, GiveawayStatus::Ongoing);
    assert_eq!(loaded.min_votes, 2);
    assert_eq!(loaded.chats.len(), 1);
    assert_eq!(loaded.membership_chats.len(), 2);
    assert!(loaded.membership_chats[1].is_system);

    assert!(matches!(
        app.giveaways.get_giveaway("missing").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_stalled_notification_does_not_block_creation() {
    let app = setup().await;
    app.notifier.stall();

    let created = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        app.giveaways.create_giveaway(ongoing_request(1)),
    )
    .await
    .expect("creation must not wait on the notifier")
    .unwrap();

    assert!(!created.notified);
    assert!(app.notifier.sent.lock().unwrap().is_empty());
    let loaded = app.giveaways.get_giveaway(&created.giveaway.id).await.unwrap();
    assert_eq!(loaded.id, created.giveaway.id);
}

#[tokio::test]
async fn test_client_supplied_system_flag_is_not_stored() {
    let app = setup().await;
    let mut req = ongoing_request(1);
    req.chats[0].is_system = true;

    let created = app.giveaways.create_giveaway(req).await.unwrap();
    let loaded = app.giveaways.get_giveaway(&created.giveaway.id).await.unwrap();
    assert!(loaded.chats.iter().all(|c| !c.is_system));
    assert!(loaded.membership_chats.iter().all(|c| !c.is_system));
}
