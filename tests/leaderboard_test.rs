mod common;

use common::*;
use vote_giveaway_backend::error::AppError;

/// 为参与者投 n 票，投票人ID从 base 起递增
async fn cast_votes(app: &TestApp, giveaway_id: &str, participant_id: &str, base: i64, n: i64) {
    for voter_id in base..base + n {
        app.voters
            .add_vote(giveaway_id, participant_id, &user(voter_id), None)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_leaderboard_scenario_with_tie_break() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 2).await;

    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(1), Some(100))
        .await
        .unwrap();
    let p2 = app
        .participants
        .add_participant(&giveaway_id, &user(2), Some(50))
        .await
        .unwrap();
    let p3 = app
        .participants
        .add_participant(&giveaway_id, &user(3), Some(150))
        .await
        .unwrap();

    cast_votes(&app, &giveaway_id, &p1.id, 1000, 3).await;
    cast_votes(&app, &giveaway_id, &p2.id, 2000, 3).await;
    cast_votes(&app, &giveaway_id, &p3.id, 3000, 1).await;

    let board = app.leaderboard.get_leaderboard(&giveaway_id, 1).await.unwrap();
    let order: Vec<(&str, u64, Option<u32>)> = board
        .leaderboard
        .iter()
        .map(|e| (e.id.as_str(), e.vote_count, e.rank))
        .collect();
    assert_eq!(
        order,
        vec![
            (p2.id.as_str(), 3, Some(1)),
            (p1.id.as_str(), 3, Some(2)),
            (p3.id.as_str(), 1, Some(3)),
        ]
    );
    assert_eq!(board.eligible_winners_count, 2);

    let viewer = board.viewer.unwrap();
    assert_eq!(viewer.id, p1.id);
    assert_eq!(viewer.rank, Some(2));

    // 单个名次与排行榜一致
    for entry in &board.leaderboard {
        let rank = app
            .leaderboard
            .compute_rank(&giveaway_id, &entry.id, 0)
            .await
            .unwrap();
        assert_eq!(rank.rank, entry.rank);
        assert_eq!(rank.vote_count, entry.vote_count);
    }
}

#[tokio::test]
async fn test_zero_vote_viewer_is_reported_without_rank() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;

    let voted = app
        .participants
        .add_participant(&giveaway_id, &user(1), None)
        .await
        .unwrap();
    let silent = app
        .participants
        .add_participant(&giveaway_id, &user(2), None)
        .await
        .unwrap();
    cast_votes(&app, &giveaway_id, &voted.id, 100, 1).await;

    let board = app.leaderboard.get_leaderboard(&giveaway_id, 2).await.unwrap();
    assert_eq!(board.leaderboard.len(), 1);
    let viewer = board.viewer.unwrap();
    assert_eq!(viewer.id, silent.id);
    assert_eq!(viewer.vote_count, 0);
    assert_eq!(viewer.rank, None);

    let outsider = app.leaderboard.get_leaderboard(&giveaway_id, 999).await.unwrap();
    assert!(outsider.viewer.is_none());

    let rank = app
        .leaderboard
        .get_participant_rank(&silent.id, 0)
        .await
        .unwrap();
    assert_eq!(rank.rank, None);
    assert_eq!(rank.vote_count, 0);
    assert!(!rank.has_voter_voted);
}

#[tokio::test]
async fn test_invalidated_votes_are_not_counted() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 2).await;
    let p1 = app
        .participants
        .add_participant(&giveaway_id, &user(1), None)
        .await
        .unwrap();

    cast_votes(&app, &giveaway_id, &p1.id, 100, 2).await;
    let (extra, _) = app
        .voters
        .add_vote(&giveaway_id, &p1.id, &user(500), None)
        .await
        .unwrap();
    app.voters.invalidate_vote(&extra.id).await.unwrap();

    let rank = app
        .leaderboard
        .get_participant_rank(&p1.id, 500)
        .await
        .unwrap();
    assert_eq!(rank.vote_count, 2);
    assert!(!rank.has_voter_voted);

    let rank = app
        .leaderboard
        .get_participant_rank(&p1.id, 100)
        .await
        .unwrap();
    assert!(rank.has_voter_voted);

    // 全部失效后从榜上消失
    let voters = app.voters.list_participant_voters(&p1.id, 0).await.unwrap();
    for v in voters {
        app.voters.invalidate_vote(&v.id).await.unwrap();
    }
    let board = app.leaderboard.get_leaderboard(&giveaway_id, 0).await.unwrap();
    assert!(board.leaderboard.is_empty());
    assert_eq!(board.eligible_winners_count, 0);
}

#[tokio::test]
async fn test_extra_vote_never_lowers_rank() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 1).await;

    let mut ids = Vec::new();
    for (user_id, joined) in [(1, 10), (2, 20), (3, 30)] {
        let p = app
            .participants
            .add_participant(&giveaway_id, &user(user_id), Some(joined))
            .await
            .unwrap();
        ids.push(p.id);
    }
    cast_votes(&app, &giveaway_id, &ids[0], 100, 2).await;
    cast_votes(&app, &giveaway_id, &ids[1], 200, 2).await;
    cast_votes(&app, &giveaway_id, &ids[2], 300, 1).await;

    let mut previous = app
        .leaderboard
        .compute_rank(&giveaway_id, &ids[2], 0)
        .await
        .unwrap()
        .rank
        .unwrap();
    for voter_id in 400..403 {
        cast_votes(&app, &giveaway_id, &ids[2], voter_id, 1).await;
        let current = app
            .leaderboard
            .compute_rank(&giveaway_id, &ids[2], 0)
            .await
            .unwrap()
            .rank
            .unwrap();
        assert!(current <= previous);
        previous = current;
    }
    assert_eq!(previous, 1);
}

#[tokio::test]
async fn test_eligible_count_follows_min_votes() {
    let app = setup().await;
    let giveaway_id = create_ongoing(&app, 3).await;

    let votes = [5, 5, 3, 1];
    for (i, n) in votes.iter().enumerate() {
        let p = app
            .participants
            .add_participant(&giveaway_id, &user(i as i64 + 1), None)
            .await
            .unwrap();
        cast_votes(&app, &giveaway_id, &p.id, 1000 * (i as i64 + 1), *n).await;
    }

    let board = app.leaderboard.get_leaderboard(&giveaway_id, 0).await.unwrap();
    assert_eq!(board.leaderboard.len(), 4);
    assert_eq!(board.eligible_winners_count, 3);

    let stricter = app
        .leaderboard
        .compute_leaderboard(&giveaway_id, 0, 6)
        .await
        .unwrap();
    assert_eq!(stricter.eligible_winners_count, 0);
}

#[tokio::test]
async fn test_votes_in_other_giveaways_are_isolated() {
    let app = setup().await;
    let a = create_ongoing(&app, 1).await;
    let b = create_ongoing(&app, 1).await;

    let pa = app.participants.add_participant(&a, &user(1), None).await.unwrap();
    let pb = app.participants.add_participant(&b, &user(1), None).await.unwrap();
    cast_votes(&app, &a, &pa.id, 100, 2).await;
    cast_votes(&app, &b, &pb.id, 100, 1).await;

    let board_a = app.leaderboard.get_leaderboard(&a, 1).await.unwrap();
    assert_eq!(board_a.leaderboard.len(), 1);
    assert_eq!(board_a.leaderboard[0].vote_count, 2);
    assert_eq!(board_a.viewer.unwrap().id, pa.id);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = setup().await;
    assert!(matches!(
        app.leaderboard.get_leaderboard("missing", 0).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        app.leaderboard.get_participant_rank("missing", 0).await,
        Err(AppError::NotFound(_))
    ));
}
