//! CSJ (dialogue corpus) tables

use super::text_columns;
use crate::error::Result;
use crate::roles::AttributeBundle;
use corpus_common::db::quote_ident;
use sqlx::{Row, SqlitePool};

/// Clause row carrying both talk owners' demographics
#[derive(Debug, Clone)]
pub struct ResultsRow {
    pub id: i64,
    pub talk_id: String,
    pub clause_id: Option<String>,
    /// Left-channel owner
    pub interviewer: AttributeBundle,
    /// Right-channel owner
    pub interviewee: AttributeBundle,
}

/// Clause row awaiting speaker/interlocutor identifiers
#[derive(Debug, Clone)]
pub struct DatasetRow {
    pub id: i64,
    pub talk_id: String,
    pub clause_id: Option<String>,
}

/// Interviewer and interviewee of one talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueIds {
    pub talk_id: String,
    pub interviewer_id: String,
    pub interviewee_id: String,
}

/// Load every clause of the results table in table order
pub async fn fetch_results(pool: &SqlitePool, table: &str) -> Result<Vec<ResultsRow>> {
    let sql = format!(
        r#"
        SELECT ID, {}
        FROM {}
        ORDER BY ID
        "#,
        text_columns(&[
            "TalkID",
            "ClauseID",
            "Talk_Interviewer_Sex",
            "Talk_Interviewer_AgeRange",
            "Talk_Interviewer_BirthPlace",
            "Talk_Speaker_Sex",
            "Talk_Speaker_AgeRange",
            "Talk_Speaker_BirthPlace",
        ]),
        quote_ident(table)
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter()
        .map(|row| -> Result<ResultsRow> {
            Ok(ResultsRow {
                id: row.try_get("ID")?,
                talk_id: row.try_get("TalkID")?,
                clause_id: row.try_get("ClauseID")?,
                interviewer: AttributeBundle {
                    sex: row.try_get("Talk_Interviewer_Sex")?,
                    age_range: row.try_get("Talk_Interviewer_AgeRange")?,
                    birthplace: row.try_get("Talk_Interviewer_BirthPlace")?,
                },
                interviewee: AttributeBundle {
                    sex: row.try_get("Talk_Speaker_Sex")?,
                    age_range: row.try_get("Talk_Speaker_AgeRange")?,
                    birthplace: row.try_get("Talk_Speaker_BirthPlace")?,
                },
            })
        })
        .collect()
}

/// Write speaker and interlocutor bundles onto a clause
pub async fn update_roles(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    speaker: &AttributeBundle,
    interlocutor: &AttributeBundle,
) -> Result<u64> {
    let sql = format!(
        r#"
        UPDATE {}
        SET Speaker_Sex = ?, Speaker_AgeRange = ?, Speaker_BirthPlace = ?,
            Interlocutor_Sex = ?, Interlocutor_AgeRange = ?, Interlocutor_BirthPlace = ?
        WHERE ID = ?
        "#,
        quote_ident(table)
    );

    let result = sqlx::query(&sql)
        .bind(&speaker.sex)
        .bind(&speaker.age_range)
        .bind(&speaker.birthplace)
        .bind(&interlocutor.sex)
        .bind(&interlocutor.age_range)
        .bind(&interlocutor.birthplace)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Load every clause of the dataset table in table order
pub async fn fetch_dataset(pool: &SqlitePool, table: &str) -> Result<Vec<DatasetRow>> {
    let sql = format!(
        "SELECT ID, {} FROM {} ORDER BY ID",
        text_columns(&["TalkID", "ClauseID"]),
        quote_ident(table)
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter()
        .map(|row| -> Result<DatasetRow> {
            Ok(DatasetRow {
                id: row.try_get("ID")?,
                talk_id: row.try_get("TalkID")?,
                clause_id: row.try_get("ClauseID")?,
            })
        })
        .collect()
}

/// Load the talk to participant mapping
pub async fn fetch_dialogues(pool: &SqlitePool, table: &str) -> Result<Vec<DialogueIds>> {
    let sql = format!(
        "SELECT {} FROM {}",
        text_columns(&["Talk_ID", "Interviewer_ID", "Interviewee_ID"]),
        quote_ident(table)
    );

    let rows: Vec<(String, String, String)> = sqlx::query_as(&sql).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(talk_id, interviewer_id, interviewee_id)| DialogueIds {
            talk_id,
            interviewer_id,
            interviewee_id,
        })
        .collect())
}

/// Write speaker and interlocutor identifiers onto a clause
pub async fn update_participant_ids(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    speaker_id: &str,
    interlocutor_id: &str,
) -> Result<u64> {
    let sql = format!(
        "UPDATE {} SET SpeakerID = ?, InterlocutorID = ? WHERE ID = ?",
        quote_ident(table)
    );

    let result = sqlx::query(&sql)
        .bind(speaker_id)
        .bind(interlocutor_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
