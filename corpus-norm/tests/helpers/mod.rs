//! Shared fixtures for job integration tests

#![allow(dead_code)]

use corpus_common::TableNames;
use corpus_norm::BatchRunner;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory database with every corpus table created
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    corpus_common::db::init_schema(&pool, &TableNames::default())
        .await
        .expect("Failed to initialize schema");

    pool
}

pub fn runner(pool: &SqlitePool) -> BatchRunner {
    BatchRunner::new(pool.clone(), TableNames::default())
}

pub async fn insert_original(
    pool: &SqlitePool,
    talk_id: &str,
    start_position: i64,
    preceding: Option<&str>,
    verb: &str,
    following: Option<&str>,
    speaker_id: &str,
    sex: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO "CWPC Original" (
            Corpus, TalkID, StartPosition, ConsecutiveNumber, PrecedingContext, Verb,
            FollowingContext, Lexeme, SpeakerID, Sex, AgeRange, Occupation
        ) VALUES ('CWPC', ?, ?, 1, ?, ?, ?, ?, ?, ?, '30-39', '会社員')
        "#,
    )
    .bind(talk_id)
    .bind(start_position)
    .bind(preceding)
    .bind(verb)
    .bind(following)
    .bind(verb)
    .bind(speaker_id)
    .bind(sex)
    .execute(pool)
    .await
    .expect("Failed to insert original row");
}

/// Insert an utterance row with a full demographic snapshot
pub async fn insert_utterance(pool: &SqlitePool, talk_id: &str, speaker_id: Option<&str>, text: &str) -> i64 {
    let sex = speaker_id.map(|id| if id.ends_with('F') { "F" } else { "M" });
    let result = sqlx::query(
        r#"
        INSERT INTO "CWPC Reformatted" (
            TalkID, Utterance, SpeakerID, Sex, AgeRange, Occupation, OccupationType,
            Post, Origin, LongestPlaceOfResidence
        ) VALUES (?, ?, ?, ?, ?, ?, '常勤', ?, ?, ?)
        "#,
    )
    .bind(talk_id)
    .bind(text)
    .bind(speaker_id)
    .bind(sex)
    .bind(speaker_id.map(|id| format!("age-{}", id)))
    .bind(speaker_id.map(|id| format!("job-{}", id)))
    .bind(speaker_id.map(|id| format!("post-{}", id)))
    .bind(speaker_id.map(|id| format!("origin-{}", id)))
    .bind(speaker_id.map(|id| format!("home-{}", id)))
    .execute(pool)
    .await
    .expect("Failed to insert utterance");

    result.last_insert_rowid()
}

pub async fn insert_results_clause(pool: &SqlitePool, talk_id: &str, clause_id: &str) -> i64 {
    let result = sqlx::query(
        r#"
        INSERT INTO "CSJ Results" (
            TalkID, ClauseID, StartTime, EndTime,
            Talk_Interviewer_Sex, Talk_Interviewer_AgeRange, Talk_Interviewer_BirthPlace,
            Talk_Speaker_Sex, Talk_Speaker_AgeRange, Talk_Speaker_BirthPlace
        ) VALUES (?, ?, 0.0, 1.5, 'M', '40-49', '大阪', 'F', '20-29', '福岡')
        "#,
    )
    .bind(talk_id)
    .bind(clause_id)
    .execute(pool)
    .await
    .expect("Failed to insert results clause");

    result.last_insert_rowid()
}

pub async fn insert_dataset_clause(pool: &SqlitePool, talk_id: &str, clause_id: &str) -> i64 {
    let result = sqlx::query(r#"INSERT INTO "CSJ Dataset" (TalkID, ClauseID) VALUES (?, ?)"#)
        .bind(talk_id)
        .bind(clause_id)
        .execute(pool)
        .await
        .expect("Failed to insert dataset clause");

    result.last_insert_rowid()
}

pub async fn insert_dialogue(pool: &SqlitePool, talk_id: &str, interviewer: &str, interviewee: &str) {
    sqlx::query(r#"INSERT INTO "Dialogues" (Talk_ID, Interviewer_ID, Interviewee_ID) VALUES (?, ?, ?)"#)
        .bind(talk_id)
        .bind(interviewer)
        .bind(interviewee)
        .execute(pool)
        .await
        .expect("Failed to insert dialogue");
}

pub async fn insert_cwpc_dataset(
    pool: &SqlitePool,
    speaker_age: Option<&str>,
    interlocutor_age: Option<&str>,
    speaker_occupation: Option<&str>,
    interlocutor_occupation: Option<&str>,
) -> i64 {
    let result = sqlx::query(
        r#"
        INSERT INTO "CWPC Dataset" (
            Speaker_OriginalAge, Interlocutor_OriginalAge, Speaker_AgeRange, Interlocutor_AgeRange,
            Speaker_Occupation, Interlocutor_Occupation
        ) VALUES (?, ?, 'previous', 'previous', ?, ?)
        "#,
    )
    .bind(speaker_age)
    .bind(interlocutor_age)
    .bind(speaker_occupation)
    .bind(interlocutor_occupation)
    .execute(pool)
    .await
    .expect("Failed to insert dataset row");

    result.last_insert_rowid()
}

pub async fn insert_occupation(pool: &SqlitePool, role: &str, major: &str, minor: &str, number: i64) {
    sqlx::query(r#"INSERT INTO "JSOC" (Role, MajorCategory, MinorCategory, AssignedNumber) VALUES (?, ?, ?, ?)"#)
        .bind(role)
        .bind(major)
        .bind(minor)
        .bind(number)
        .execute(pool)
        .await
        .expect("Failed to insert occupation");
}

/// Selected columns of every row as JSON arrays, for before/after comparison
pub async fn table_snapshot(pool: &SqlitePool, table: &str, columns: &str) -> Vec<String> {
    let sql = format!(r#"SELECT json_array({}) FROM "{}" ORDER BY ID"#, columns, table);
    let rows: Vec<(String,)> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .expect("Failed to snapshot table");

    rows.into_iter().map(|(row,)| row).collect()
}

/// Replace a table with one shaped like a raw import (given column list)
pub async fn recreate_table(pool: &SqlitePool, table: &str, columns: &str) {
    sqlx::query(&format!(r#"DROP TABLE "{}""#, table))
        .execute(pool)
        .await
        .expect("Failed to drop table");
    sqlx::query(&format!(r#"CREATE TABLE "{}" ({})"#, table, columns))
        .execute(pool)
        .await
        .expect("Failed to create import-shaped table");
}
