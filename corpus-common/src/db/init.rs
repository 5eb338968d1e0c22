//! Schema bootstrap
//!
//! Creates every table the normalization jobs touch. All statements use
//! `CREATE TABLE IF NOT EXISTS`, so calling this against an imported corpus
//! database is a no-op for tables that already exist.

use super::quote_ident;
use crate::config::TableNames;
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create all corpus tables if missing
pub async fn init_schema(pool: &SqlitePool, tables: &TableNames) -> Result<()> {
    create_csj_results_table(pool, &tables.csj_results).await?;
    create_csj_dataset_table(pool, &tables.csj_dataset).await?;
    create_dialogues_table(pool, &tables.csj_dialogues).await?;
    create_cwpc_original_table(pool, &tables.cwpc_original).await?;
    create_cwpc_reformatted_table(pool, &tables.cwpc_reformatted).await?;
    create_cwpc_dataset_table(pool, &tables.cwpc_dataset).await?;
    create_occupations_table(pool, &tables.occupations).await?;

    info!("Corpus schema initialized");
    Ok(())
}

pub async fn create_csj_results_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TalkID TEXT NOT NULL,
            ClauseID TEXT,
            StartTime REAL,
            EndTime REAL,
            Talk_Interviewer_Sex TEXT,
            Talk_Interviewer_AgeRange TEXT,
            Talk_Interviewer_BirthPlace TEXT,
            Talk_Speaker_Sex TEXT,
            Talk_Speaker_AgeRange TEXT,
            Talk_Speaker_BirthPlace TEXT,
            Speaker_Sex TEXT,
            Speaker_AgeRange TEXT,
            Speaker_BirthPlace TEXT,
            Interlocutor_Sex TEXT,
            Interlocutor_AgeRange TEXT,
            Interlocutor_BirthPlace TEXT
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_csj_dataset_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TalkID TEXT NOT NULL,
            ClauseID TEXT,
            SpeakerID TEXT,
            InterlocutorID TEXT
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_dialogues_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            Talk_ID TEXT PRIMARY KEY,
            Interviewer_ID TEXT NOT NULL,
            Interviewee_ID TEXT NOT NULL
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_cwpc_original_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Corpus TEXT,
            TalkID TEXT NOT NULL,
            StartPosition INTEGER,
            ConsecutiveNumber INTEGER,
            PrecedingContext TEXT,
            Verb TEXT NOT NULL,
            FollowingContext TEXT,
            LexemeReading TEXT,
            Lexeme TEXT,
            LexemeSubclassification TEXT,
            WordType TEXT,
            POS TEXT,
            ConjugationType TEXT,
            ConjugationForm TEXT,
            PronunciationForm TEXT,
            JapaneseOrChineseOrigin TEXT,
            OriginalString TEXT,
            MorningOrMeetingOrBreak TEXT,
            Subcategory TEXT,
            SurveyDate TEXT,
            Location TEXT,
            ConversationParticipants TEXT,
            SpeakerID TEXT,
            Sex TEXT,
            AgeRange TEXT,
            Occupation TEXT,
            OccupationType TEXT,
            Post TEXT,
            Origin TEXT,
            LongestPlaceOfResidence TEXT
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_cwpc_reformatted_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Corpus TEXT,
            TalkID TEXT NOT NULL,
            StartPosition INTEGER,
            ConsecutiveNumber INTEGER,
            Utterance TEXT NOT NULL,
            LexemeReading TEXT,
            Lexeme TEXT,
            LexemeSubclassification TEXT,
            WordType TEXT,
            POS TEXT,
            ConjugationType TEXT,
            ConjugationForm TEXT,
            PronunciationForm TEXT,
            JapaneseOrChineseOrigin TEXT,
            OriginalString TEXT,
            MorningOrMeetingOrBreak TEXT,
            Subcategory TEXT,
            SurveyDate TEXT,
            Location TEXT,
            ConversationParticipants TEXT,
            SpeakerID TEXT,
            Sex TEXT,
            AgeRange TEXT,
            Occupation TEXT,
            OccupationType TEXT,
            Post TEXT,
            Origin TEXT,
            LongestPlaceOfResidence TEXT,
            InterlocutorID TEXT,
            Interlocutor_Sex TEXT,
            Interlocutor_AgeRange TEXT,
            Interlocutor_Occupation TEXT,
            Interlocutor_OccupationType TEXT,
            Interlocutor_Post TEXT,
            Interlocutor_Origin TEXT,
            Interlocutor_LongestPlaceOfResidence TEXT
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_cwpc_dataset_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Speaker_OriginalAge TEXT,
            Interlocutor_OriginalAge TEXT,
            Speaker_AgeRange TEXT,
            Interlocutor_AgeRange TEXT,
            Speaker_Occupation TEXT,
            Interlocutor_Occupation TEXT,
            Speaker_Occupation_MajorCategory TEXT,
            Speaker_Occupation_MinorCategory TEXT,
            Speaker_Occupation_AssignedNumber INTEGER,
            Interlocutor_Occupation_MajorCategory TEXT,
            Interlocutor_Occupation_MinorCategory TEXT,
            Interlocutor_Occupation_AssignedNumber INTEGER
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub async fn create_occupations_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            Role TEXT NOT NULL,
            MajorCategory TEXT NOT NULL,
            MinorCategory TEXT NOT NULL,
            AssignedNumber INTEGER NOT NULL
        )
        "#,
        quote_ident(table)
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}
