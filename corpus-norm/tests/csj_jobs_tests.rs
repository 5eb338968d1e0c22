//! Channel-based role resolution against an in-memory CSJ store

mod helpers;

use corpus_norm::{Error, Job};
use helpers::*;

async fn roles_of(pool: &sqlx::SqlitePool, id: i64) -> (Option<String>, Option<String>, Option<String>, Option<String>) {
    sqlx::query_as(
        r#"SELECT Speaker_Sex, Speaker_BirthPlace, Interlocutor_Sex, Interlocutor_BirthPlace FROM "CSJ Results" WHERE ID = ?"#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_channel_roles_follow_clause_suffix() {
    let pool = setup_pool().await;
    let left = insert_results_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    let right = insert_results_clause(&pool, "D01F0002", "D01F0002-0002R").await;

    let report = runner(&pool).run(Job::ResolveChannelRoles).await.unwrap();
    assert_eq!(report.rows_fetched, 2);
    assert_eq!(report.rows_updated, 2);
    assert!(report.warnings.is_empty());

    // Interviewer is M/大阪, interviewee F/福岡
    assert_eq!(
        roles_of(&pool, left).await,
        (Some("M".into()), Some("大阪".into()), Some("F".into()), Some("福岡".into()))
    );
    assert_eq!(
        roles_of(&pool, right).await,
        (Some("F".into()), Some("福岡".into()), Some("M".into()), Some("大阪".into()))
    );

    let age: (Option<String>, Option<String>) = sqlx::query_as(
        r#"SELECT Speaker_AgeRange, Interlocutor_AgeRange FROM "CSJ Results" WHERE ID = ?"#,
    )
    .bind(right)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(age, (Some("20-29".into()), Some("40-49".into())));
}

#[tokio::test]
async fn test_unknown_channel_aborts_after_earlier_writes() {
    let pool = setup_pool().await;
    let first = insert_results_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    let bad = insert_results_clause(&pool, "D01F0002", "D01F0002-0002X").await;
    let after = insert_results_clause(&pool, "D01F0002", "D01F0002-0003R").await;

    match runner(&pool).run(Job::ResolveChannelRoles).await {
        Err(Error::UnrecognizedChannel { row_id, clause_id }) => {
            assert_eq!(row_id, bad);
            assert_eq!(clause_id, "D01F0002-0002X");
        }
        other => panic!("expected channel error, got {:?}", other),
    }

    // Rows before the failure stay written, rows after are untouched
    assert_eq!(roles_of(&pool, first).await.0, Some("M".into()));
    assert_eq!(roles_of(&pool, after).await, (None, None, None, None));
}

#[tokio::test]
async fn test_channel_roles_rerun_is_stable() {
    let pool = setup_pool().await;
    insert_results_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    insert_results_clause(&pool, "D01F0002", "D01F0002-0002R").await;

    let columns = "Speaker_Sex, Speaker_AgeRange, Speaker_BirthPlace, \
                   Interlocutor_Sex, Interlocutor_AgeRange, Interlocutor_BirthPlace";

    runner(&pool).run(Job::ResolveChannelRoles).await.unwrap();
    let first = table_snapshot(&pool, "CSJ Results", columns).await;
    runner(&pool).run(Job::ResolveChannelRoles).await.unwrap();
    let second = table_snapshot(&pool, "CSJ Results", columns).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_results_table_is_fatal() {
    let pool = setup_pool().await;

    match runner(&pool).run(Job::ResolveChannelRoles).await {
        Err(Error::EmptyTable { table }) => assert_eq!(table, "CSJ Results"),
        other => panic!("expected empty table error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_speaker_ids_from_dialogues() {
    let pool = setup_pool().await;
    insert_dialogue(&pool, "D01F0002", "IV01", "IE07").await;
    let left = insert_dataset_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    let right = insert_dataset_clause(&pool, "D01F0002", "D01F0002-0002R").await;

    let report = runner(&pool).run(Job::AssignSpeakerIds).await.unwrap();
    assert_eq!(report.rows_updated, 2);

    let rows: Vec<(i64, String, String)> = sqlx::query_as(
        r#"SELECT ID, SpeakerID, InterlocutorID FROM "CSJ Dataset" ORDER BY ID"#,
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            (left, "IV01".to_string(), "IE07".to_string()),
            (right, "IE07".to_string(), "IV01".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_dialogue_is_fatal() {
    let pool = setup_pool().await;
    insert_dialogue(&pool, "D01F0002", "IV01", "IE07").await;
    insert_dataset_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    let orphan = insert_dataset_clause(&pool, "D02M0011", "D02M0011-0001R").await;

    match runner(&pool).run(Job::AssignSpeakerIds).await {
        Err(Error::MissingDialogue { row_id, talk_id }) => {
            assert_eq!(row_id, orphan);
            assert_eq!(talk_id, "D02M0011");
        }
        other => panic!("expected missing dialogue error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_speaker_ids_rerun_is_stable() {
    let pool = setup_pool().await;
    insert_dialogue(&pool, "D01F0002", "IV01", "IE07").await;
    insert_dialogue(&pool, "D02M0011", "IV02", "IE09").await;
    insert_dataset_clause(&pool, "D01F0002", "D01F0002-0001L").await;
    insert_dataset_clause(&pool, "D02M0011", "D02M0011-0001R").await;
    insert_dataset_clause(&pool, "D01F0002", "D01F0002-0002R").await;

    runner(&pool).run(Job::AssignSpeakerIds).await.unwrap();
    let first = table_snapshot(&pool, "CSJ Dataset", "SpeakerID, InterlocutorID").await;
    runner(&pool).run(Job::AssignSpeakerIds).await.unwrap();
    let second = table_snapshot(&pool, "CSJ Dataset", "SpeakerID, InterlocutorID").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_speaker_ids_read_numeric_dialogue_ids() {
    let pool = setup_pool().await;
    recreate_table(&pool, "Dialogues", "Talk_ID, Interviewer_ID, Interviewee_ID").await;
    sqlx::query(r#"INSERT INTO "Dialogues" VALUES ('D01F0002', 101, 207)"#)
        .execute(&pool)
        .await
        .unwrap();
    let id = insert_dataset_clause(&pool, "D01F0002", "D01F0002-0001R").await;

    runner(&pool).run(Job::AssignSpeakerIds).await.unwrap();

    let ids: (String, String) = sqlx::query_as(
        r#"SELECT SpeakerID, InterlocutorID FROM "CSJ Dataset" WHERE ID = ?"#,
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(ids, ("207".to_string(), "101".to_string()));
}
