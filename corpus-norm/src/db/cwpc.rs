//! CWPC (workplace conversation corpus) tables

use super::{integer_columns, text_columns, FieldWrite};
use crate::error::Result;
use crate::occupation::OccupationCode;
use crate::roles::ParticipantSnapshot;
use corpus_common::db::quote_ident;
use sqlx::{Row, SqlitePool};

/// Text columns copied verbatim from the export into the utterance table
pub const PASSTHROUGH_COLUMNS: [&str; 23] = [
    "Corpus",
    "LexemeReading",
    "Lexeme",
    "LexemeSubclassification",
    "WordType",
    "POS",
    "ConjugationType",
    "ConjugationForm",
    "PronunciationForm",
    "JapaneseOrChineseOrigin",
    "OriginalString",
    "MorningOrMeetingOrBreak",
    "Subcategory",
    "SurveyDate",
    "Location",
    "ConversationParticipants",
    "SpeakerID",
    "AgeRange",
    "Occupation",
    "OccupationType",
    "Post",
    "Origin",
    "LongestPlaceOfResidence",
];

/// One verb row of the export with its context windows
#[derive(Debug, Clone)]
pub struct OriginalRow {
    pub id: i64,
    pub talk_id: String,
    pub start_position: Option<i64>,
    pub consecutive_number: Option<i64>,
    pub preceding_context: Option<String>,
    pub verb: String,
    pub following_context: Option<String>,
    pub sex: Option<String>,
    /// Values of [`PASSTHROUGH_COLUMNS`], same order
    pub passthrough: Vec<Option<String>>,
}

/// Utterance row used for interlocutor resolution
#[derive(Debug, Clone)]
pub struct SpeakerRow {
    pub id: i64,
    pub speaker_id: Option<String>,
    /// Speaker demographics as recorded on this row
    pub snapshot: ParticipantSnapshot,
}

/// Columns holding a speaker's demographics, in [`ParticipantSnapshot`] order
const SNAPSHOT_COLUMNS: [&str; 7] = [
    "Sex",
    "AgeRange",
    "Occupation",
    "OccupationType",
    "Post",
    "Origin",
    "LongestPlaceOfResidence",
];

/// Raw ages of one dataset row
#[derive(Debug, Clone)]
pub struct AgeRow {
    pub id: i64,
    pub speaker_age: Option<String>,
    pub interlocutor_age: Option<String>,
}

/// Raw occupation labels of one dataset row
#[derive(Debug, Clone)]
pub struct OccupationRow {
    pub id: i64,
    pub speaker_occupation: Option<String>,
    pub interlocutor_occupation: Option<String>,
}

/// Load every export row in table order
pub async fn fetch_original(pool: &SqlitePool, table: &str) -> Result<Vec<OriginalRow>> {
    let sql = format!(
        r#"
        SELECT ID, {}, {}, {}
        FROM {}
        ORDER BY ID
        "#,
        integer_columns(&["StartPosition", "ConsecutiveNumber"]),
        text_columns(&["TalkID", "PrecedingContext", "Verb", "FollowingContext", "Sex"]),
        text_columns(&PASSTHROUGH_COLUMNS),
        quote_ident(table)
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter()
        .map(|row| -> Result<OriginalRow> {
            let passthrough = PASSTHROUGH_COLUMNS
                .iter()
                .map(|column| row.try_get::<Option<String>, _>(*column))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(OriginalRow {
                id: row.try_get("ID")?,
                talk_id: row.try_get("TalkID")?,
                start_position: row.try_get("StartPosition")?,
                consecutive_number: row.try_get("ConsecutiveNumber")?,
                preceding_context: row.try_get("PrecedingContext")?,
                verb: row.try_get("Verb")?,
                following_context: row.try_get("FollowingContext")?,
                sex: row.try_get("Sex")?,
                passthrough,
            })
        })
        .collect()
}

/// Whether an utterance with exactly this text is already stored
pub async fn utterance_exists(pool: &SqlitePool, table: &str, utterance: &str) -> Result<bool> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE Utterance = ?",
        quote_ident(table)
    );

    let count: i64 = sqlx::query_scalar(&sql)
        .bind(utterance)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Insert a stitched utterance with the source row's metadata
///
/// Returns the new row ID.
pub async fn insert_utterance(
    pool: &SqlitePool,
    table: &str,
    source: &OriginalRow,
    utterance: &str,
    sex: Option<&str>,
) -> Result<i64> {
    let placeholders = vec!["?"; 5 + PASSTHROUGH_COLUMNS.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} (TalkID, StartPosition, ConsecutiveNumber, Utterance, Sex, {}) VALUES ({})",
        quote_ident(table),
        PASSTHROUGH_COLUMNS.join(", "),
        placeholders
    );

    let mut query = sqlx::query(&sql)
        .bind(&source.talk_id)
        .bind(source.start_position)
        .bind(source.consecutive_number)
        .bind(utterance)
        .bind(sex);
    for value in &source.passthrough {
        query = query.bind(value.as_deref());
    }

    let result = query.execute(pool).await?;
    Ok(result.last_insert_rowid())
}

/// Distinct talk IDs in order of first appearance
pub async fn talk_ids(pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
    let sql = format!(
        "SELECT TalkID FROM {} GROUP BY TalkID ORDER BY MIN(ID)",
        quote_ident(table)
    );

    let ids: Vec<String> = sqlx::query_scalar(&sql).fetch_all(pool).await?;
    Ok(ids)
}

/// Utterance rows of one talk in table order, with speaker demographics
pub async fn speaker_rows(pool: &SqlitePool, table: &str, talk_id: &str) -> Result<Vec<SpeakerRow>> {
    let sql = format!(
        "SELECT ID, {}, {} FROM {} WHERE TalkID = ? ORDER BY ID",
        text_columns(&["SpeakerID"]),
        text_columns(&SNAPSHOT_COLUMNS),
        quote_ident(table)
    );

    let rows = sqlx::query(&sql).bind(talk_id).fetch_all(pool).await?;

    rows.iter()
        .map(|row| -> Result<SpeakerRow> {
            Ok(SpeakerRow {
                id: row.try_get("ID")?,
                speaker_id: row.try_get("SpeakerID")?,
                snapshot: ParticipantSnapshot {
                    sex: row.try_get("Sex")?,
                    age_range: row.try_get("AgeRange")?,
                    occupation: row.try_get("Occupation")?,
                    occupation_type: row.try_get("OccupationType")?,
                    post: row.try_get("Post")?,
                    origin: row.try_get("Origin")?,
                    longest_residence: row.try_get("LongestPlaceOfResidence")?,
                },
            })
        })
        .collect()
}

/// Write the interlocutor and their snapshot onto an utterance
pub async fn update_interlocutor(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    interlocutor_id: &str,
    snapshot: &ParticipantSnapshot,
) -> Result<u64> {
    let sql = format!(
        r#"
        UPDATE {}
        SET InterlocutorID = ?, Interlocutor_Sex = ?, Interlocutor_AgeRange = ?,
            Interlocutor_Occupation = ?, Interlocutor_OccupationType = ?, Interlocutor_Post = ?,
            Interlocutor_Origin = ?, Interlocutor_LongestPlaceOfResidence = ?
        WHERE ID = ?
        "#,
        quote_ident(table)
    );

    let result = sqlx::query(&sql)
        .bind(interlocutor_id)
        .bind(&snapshot.sex)
        .bind(&snapshot.age_range)
        .bind(&snapshot.occupation)
        .bind(&snapshot.occupation_type)
        .bind(&snapshot.post)
        .bind(&snapshot.origin)
        .bind(&snapshot.longest_residence)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Load raw ages of every dataset row
pub async fn fetch_ages(pool: &SqlitePool, table: &str) -> Result<Vec<AgeRow>> {
    let sql = format!(
        "SELECT ID, {} FROM {} ORDER BY ID",
        text_columns(&["Speaker_OriginalAge", "Interlocutor_OriginalAge"]),
        quote_ident(table)
    );

    let rows: Vec<(i64, Option<String>, Option<String>)> =
        sqlx::query_as(&sql).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(id, speaker_age, interlocutor_age)| AgeRow {
            id,
            speaker_age,
            interlocutor_age,
        })
        .collect())
}

/// Write age buckets, leaving skipped fields untouched
pub async fn update_age_ranges(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    speaker: FieldWrite<'_>,
    interlocutor: FieldWrite<'_>,
) -> Result<u64> {
    let sql = format!(
        r#"
        UPDATE {}
        SET Speaker_AgeRange = CASE WHEN ? THEN ? ELSE Speaker_AgeRange END,
            Interlocutor_AgeRange = CASE WHEN ? THEN ? ELSE Interlocutor_AgeRange END
        WHERE ID = ?
        "#,
        quote_ident(table)
    );

    let (set_speaker, speaker_value) = speaker.bind_pair();
    let (set_interlocutor, interlocutor_value) = interlocutor.bind_pair();

    let result = sqlx::query(&sql)
        .bind(set_speaker)
        .bind(speaker_value)
        .bind(set_interlocutor)
        .bind(interlocutor_value)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Load raw occupation labels of every dataset row
pub async fn fetch_occupations(pool: &SqlitePool, table: &str) -> Result<Vec<OccupationRow>> {
    let sql = format!(
        "SELECT ID, {} FROM {} ORDER BY ID",
        text_columns(&["Speaker_Occupation", "Interlocutor_Occupation"]),
        quote_ident(table)
    );

    let rows: Vec<(i64, Option<String>, Option<String>)> =
        sqlx::query_as(&sql).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(id, speaker_occupation, interlocutor_occupation)| OccupationRow {
            id,
            speaker_occupation,
            interlocutor_occupation,
        })
        .collect())
}

/// Write both occupation codes of a dataset row
pub async fn update_occupation_codes(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    speaker: &OccupationCode,
    interlocutor: &OccupationCode,
) -> Result<u64> {
    let sql = format!(
        r#"
        UPDATE {}
        SET Speaker_Occupation_MajorCategory = ?, Speaker_Occupation_MinorCategory = ?,
            Speaker_Occupation_AssignedNumber = ?,
            Interlocutor_Occupation_MajorCategory = ?, Interlocutor_Occupation_MinorCategory = ?,
            Interlocutor_Occupation_AssignedNumber = ?
        WHERE ID = ?
        "#,
        quote_ident(table)
    );

    let result = sqlx::query(&sql)
        .bind(&speaker.major)
        .bind(&speaker.minor)
        .bind(speaker.number)
        .bind(&interlocutor.major)
        .bind(&interlocutor.minor)
        .bind(interlocutor.number)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
