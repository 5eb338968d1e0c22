//! Batch runner
//!
//! Each job is one sequential pass over its source table: fetch the working
//! set (empty is fatal), resolve/normalize per row, write back, and return a
//! [`RunReport`]. Fatal errors abort the pass; rows written before the error
//! stay written, and every job can be re-run over the same data with the
//! same result.

use crate::age::{normalize_age, AgeOutcome};
use crate::db::{self, csj, cwpc, jsoc, FieldWrite};
use crate::error::{Error, Result};
use crate::occupation::OccupationTable;
use crate::report::{ResolutionWarning, Role, RunReport, SkipList};
use crate::roles::{Channel, Dyad, DyadPairing};
use crate::stitcher::{stitch, translate_sex};
use corpus_common::TableNames;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Normalization jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Build CWPC utterances from verb context windows
    StitchUtterances,
    /// Assign CSJ speaker/interlocutor IDs from channel markers
    AssignSpeakerIds,
    /// Assign CSJ speaker/interlocutor demographics from channel markers
    ResolveChannelRoles,
    /// Assign CWPC interlocutors by dyadic elimination
    ResolveInterlocutors,
    /// Bucket CWPC raw ages
    AssignAgeRanges,
    /// Categorise CWPC occupations
    AssignOccupations,
}

impl Job {
    pub fn name(self) -> &'static str {
        match self {
            Job::StitchUtterances => "stitch-utterances",
            Job::AssignSpeakerIds => "assign-speaker-ids",
            Job::ResolveChannelRoles => "resolve-channel-roles",
            Job::ResolveInterlocutors => "resolve-interlocutors",
            Job::AssignAgeRanges => "assign-age-ranges",
            Job::AssignOccupations => "assign-occupations",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drives normalization jobs against the row store
pub struct BatchRunner {
    pool: SqlitePool,
    tables: TableNames,
}

impl BatchRunner {
    pub fn new(pool: SqlitePool, tables: TableNames) -> Self {
        Self { pool, tables }
    }

    /// Run one job to completion
    pub async fn run(&self, job: Job) -> Result<RunReport> {
        info!(job = %job, "Executing job");

        let report = match job {
            Job::StitchUtterances => self.stitch_utterances().await?,
            Job::AssignSpeakerIds => self.assign_speaker_ids().await?,
            Job::ResolveChannelRoles => self.resolve_channel_roles().await?,
            Job::ResolveInterlocutors => self.resolve_interlocutors().await?,
            Job::AssignAgeRanges => self.assign_age_ranges().await?,
            Job::AssignOccupations => self.assign_occupations().await?,
        };

        report.log_summary();
        Ok(report)
    }

    /// Insert one utterance per distinct stitched text
    pub async fn stitch_utterances(&self) -> Result<RunReport> {
        let source = &self.tables.cwpc_original;
        let target = &self.tables.cwpc_reformatted;
        let mut report = RunReport::new(Job::StitchUtterances.name(), source);

        info!("Retrieving rows from '{}'", source);
        let rows = db::require_rows(cwpc::fetch_original(&self.pool, source).await?, source)?;
        report.rows_fetched = rows.len();
        info!("Rows retrieved successfully. Row count: {}", rows.len());

        for row in &rows {
            let utterance = stitch(
                row.preceding_context.as_deref(),
                &row.verb,
                row.following_context.as_deref(),
            );

            if cwpc::utterance_exists(&self.pool, target, &utterance).await? {
                debug!(talk_id = %row.talk_id, utterance = %utterance, "Utterance exists, skipping");
                report.duplicates_skipped += 1;
                continue;
            }

            let sex = translate_sex(row.sex.clone());
            let new_id =
                cwpc::insert_utterance(&self.pool, target, row, &utterance, sex.as_deref()).await?;
            debug!(
                talk_id = %row.talk_id,
                start_position = ?row.start_position,
                new_id,
                "Inserted utterance"
            );
            report.rows_inserted += 1;
        }

        Ok(report.finish(&SkipList::new()))
    }

    /// Set SpeakerID/InterlocutorID on CSJ clauses from the talk's dialogue record
    pub async fn assign_speaker_ids(&self) -> Result<RunReport> {
        let dialogues_table = &self.tables.csj_dialogues;
        let table = &self.tables.csj_dataset;
        let mut report = RunReport::new(Job::AssignSpeakerIds.name(), table);

        let dialogues = db::require_rows(
            csj::fetch_dialogues(&self.pool, dialogues_table).await?,
            dialogues_table,
        )?;
        info!("Dialogues retrieved successfully. Row count: {}", dialogues.len());

        let mut by_talk = HashMap::with_capacity(dialogues.len());
        for dialogue in dialogues {
            by_talk.entry(dialogue.talk_id.clone()).or_insert(dialogue);
        }

        let rows = db::require_rows(csj::fetch_dataset(&self.pool, table).await?, table)?;
        report.rows_fetched = rows.len();

        for row in &rows {
            let dialogue = by_talk.get(&row.talk_id).ok_or_else(|| Error::MissingDialogue {
                row_id: row.id,
                talk_id: row.talk_id.clone(),
            })?;

            let channel = Channel::classify(row.id, row.clause_id.as_deref())?;
            let (speaker, interlocutor) = channel.assign(
                dialogue.interviewer_id.as_str(),
                dialogue.interviewee_id.as_str(),
            );

            report.rows_updated +=
                csj::update_participant_ids(&self.pool, table, row.id, speaker, interlocutor).await?
                    as usize;
            debug!(row_id = row.id, speaker, interlocutor, "Set participant IDs");
        }

        Ok(report.finish(&SkipList::new()))
    }

    /// Copy talk-level demographics onto CSJ clauses by channel
    pub async fn resolve_channel_roles(&self) -> Result<RunReport> {
        let table = &self.tables.csj_results;
        let mut report = RunReport::new(Job::ResolveChannelRoles.name(), table);

        let rows = db::require_rows(csj::fetch_results(&self.pool, table).await?, table)?;
        report.rows_fetched = rows.len();
        info!("Rows retrieved successfully. Row count: {}", rows.len());

        for row in &rows {
            let channel = Channel::classify(row.id, row.clause_id.as_deref())?;
            let (speaker, interlocutor) = channel.assign(&row.interviewer, &row.interviewee);

            debug!(
                row_id = row.id,
                talk_id = %row.talk_id,
                ?channel,
                speaker_sex = ?speaker.sex,
                speaker_age = ?speaker.age_range,
                "Setting clause roles"
            );
            report.rows_updated +=
                csj::update_roles(&self.pool, table, row.id, speaker, interlocutor).await? as usize;
        }

        Ok(report.finish(&SkipList::new()))
    }

    /// Assign interlocutors in CWPC talks with exactly two participants
    pub async fn resolve_interlocutors(&self) -> Result<RunReport> {
        let table = &self.tables.cwpc_reformatted;
        let mut report = RunReport::new(Job::ResolveInterlocutors.name(), table);
        let mut skips = SkipList::new();

        let talks = db::require_rows(cwpc::talk_ids(&self.pool, table).await?, table)?;
        info!("Talks retrieved successfully. Talk count: {}", talks.len());

        for talk_id in &talks {
            self.resolve_talk(talk_id, &mut report, &mut skips).await?;
        }

        Ok(report.finish(&skips))
    }

    async fn resolve_talk(
        &self,
        talk_id: &str,
        report: &mut RunReport,
        skips: &mut SkipList,
    ) -> Result<()> {
        let table = &self.tables.cwpc_reformatted;
        let rows = cwpc::speaker_rows(&self.pool, table, talk_id).await?;
        report.rows_fetched += rows.len();

        let dyad = match Dyad::from_rows(
            rows.iter()
                .map(|r| (r.speaker_id.clone(), r.snapshot.clone())),
        ) {
            DyadPairing::Dyad(dyad) => dyad,
            DyadPairing::Unresolvable { participants } => {
                info!(talk_id, participants, "Talk is not a dyad, skipping");
                report.warn(ResolutionWarning::NonDyadic {
                    talk_id: talk_id.to_string(),
                    participants,
                });
                skips.record(talk_id);
                return Ok(());
            }
        };

        info!(talk_id, participants = ?dyad.participants(), "Talk is a dyad, going ahead");

        for orientation in dyad.orientations() {
            let speaker = orientation.speaker;
            let spoken = rows
                .iter()
                .filter(|r| r.speaker_id.as_deref() == Some(speaker.id.as_str()));

            if let Some((role, participant_id)) = orientation.placeholder() {
                for row in spoken {
                    skip_placeholder(talk_id, row.id, role, participant_id, report, skips);
                }
                continue;
            }

            let interlocutor = orientation.interlocutor;
            for row in spoken {
                debug!(
                    talk_id,
                    row_id = row.id,
                    speaker = %speaker.id,
                    interlocutor = %interlocutor.id,
                    "Setting interlocutor"
                );
                report.rows_updated += cwpc::update_interlocutor(
                    &self.pool,
                    table,
                    row.id,
                    &interlocutor.id,
                    &interlocutor.snapshot,
                )
                .await? as usize;
            }
        }

        Ok(())
    }

    /// Bucket speaker and interlocutor ages
    pub async fn assign_age_ranges(&self) -> Result<RunReport> {
        let table = &self.tables.cwpc_dataset;
        let mut report = RunReport::new(Job::AssignAgeRanges.name(), table);

        let rows = db::require_rows(cwpc::fetch_ages(&self.pool, table).await?, table)?;
        report.rows_fetched = rows.len();
        info!("Rows retrieved successfully. Row count: {}", rows.len());

        for row in &rows {
            let speaker = age_write(&mut report, row.id, Role::Speaker, row.speaker_age.as_deref());
            let interlocutor = age_write(
                &mut report,
                row.id,
                Role::Interlocutor,
                row.interlocutor_age.as_deref(),
            );

            report.rows_updated +=
                cwpc::update_age_ranges(&self.pool, table, row.id, speaker, interlocutor).await?
                    as usize;
        }

        Ok(report.finish(&SkipList::new()))
    }

    /// Map speaker and interlocutor occupations to category codes
    pub async fn assign_occupations(&self) -> Result<RunReport> {
        let reference = &self.tables.occupations;
        let table = &self.tables.cwpc_dataset;
        let mut report = RunReport::new(Job::AssignOccupations.name(), table);

        let entries = db::require_rows(jsoc::fetch_entries(&self.pool, reference).await?, reference)?;
        let occupations = OccupationTable::from_entries(entries);
        info!(
            "Occupational categories retrieved successfully. Label count: {}",
            occupations.len()
        );

        let rows = db::require_rows(cwpc::fetch_occupations(&self.pool, table).await?, table)?;
        report.rows_fetched = rows.len();

        for row in &rows {
            let speaker = occupations.map(row.id, row.speaker_occupation.as_deref())?;
            let interlocutor = occupations.map(row.id, row.interlocutor_occupation.as_deref())?;

            report.rows_updated +=
                cwpc::update_occupation_codes(&self.pool, table, row.id, &speaker, &interlocutor)
                    .await? as usize;
            debug!(
                row_id = row.id,
                speaker = speaker.number,
                interlocutor = interlocutor.number,
                "Row updated"
            );
        }

        Ok(report.finish(&SkipList::new()))
    }
}

/// Record a placeholder participant skip
fn skip_placeholder(
    talk_id: &str,
    row_id: i64,
    role: Role,
    participant_id: &str,
    report: &mut RunReport,
    skips: &mut SkipList,
) {
    warn!(
        talk_id,
        row_id,
        %role,
        participant_id,
        "Participant ID is a placeholder without demographics, skipping"
    );
    report.warn(ResolutionWarning::PlaceholderParticipant {
        talk_id: talk_id.to_string(),
        row_id,
        role,
        participant_id: participant_id.to_string(),
    });
    skips.record(talk_id);
}

/// Decide what to store for one age field
fn age_write(
    report: &mut RunReport,
    row_id: i64,
    role: Role,
    raw: Option<&str>,
) -> FieldWrite<'static> {
    let Some(raw) = raw else {
        warn!(row_id, %role, "Age is missing, skipping field");
        report.warn(ResolutionWarning::NonNumericAge {
            row_id,
            role,
            raw: None,
        });
        return FieldWrite::Keep;
    };

    match normalize_age(raw) {
        AgeOutcome::Bucketed(bucket) => {
            debug!(row_id, %role, original = raw, age_range = %bucket, "Age identified");
            FieldWrite::Set(Some(bucket.label()))
        }
        AgeOutcome::Unresolved(encoding) => {
            warn!(row_id, %role, original = raw, ?encoding, "Age outside known ranges");
            report.warn(ResolutionWarning::UnresolvedAge {
                row_id,
                role,
                raw: raw.to_string(),
            });
            FieldWrite::Set(None)
        }
        AgeOutcome::NonNumeric => {
            warn!(row_id, %role, original = raw, "Age is not numeric, skipping field");
            report.warn(ResolutionWarning::NonNumericAge {
                row_id,
                role,
                raw: Some(raw.to_string()),
            });
            FieldWrite::Keep
        }
    }
}
