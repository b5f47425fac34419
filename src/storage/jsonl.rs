//! JSONL (JSON Lines) document store.
//!
//! One directory per tournament, one file per record type. Each line is a
//! valid JSON object representing one document. Updates rewrite the whole
//! file; the engine assumes a single organiser writing at a time, so no
//! locking is layered on top.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError, TournamentStore};
use crate::models::{
    Pairing, PairingId, Participant, ParticipantId, ParticipationStatus, Round, RoundId,
    TournamentId,
};

/// Record types stored per tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFile {
    Participants,
    Rounds,
    Pairings,
}

impl RecordFile {
    /// Get the filename for this record type.
    pub fn filename(&self) -> &'static str {
        match self {
            RecordFile::Participants => "participants.jsonl",
            RecordFile::Rounds => "rounds.jsonl",
            RecordFile::Pairings => "pairings.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a record type within a tournament's directory.
    pub fn for_tournament(
        config: &StorageConfig,
        record: RecordFile,
        tournament_id: &TournamentId,
    ) -> Self {
        let path = config.tournament_dir(tournament_id).join(record.filename());
        Self::new(path)
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Append multiple records to the file.
    pub fn append_batch(&self, records: &[T]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Appended {} records to {:?}", count, self.path);

        Ok(count)
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        debug!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a record type within a tournament's directory.
    pub fn for_tournament(
        config: &StorageConfig,
        record: RecordFile,
        tournament_id: &TournamentId,
    ) -> Self {
        let path = config.tournament_dir(tournament_id).join(record.filename());
        Self::new(path)
    }

    /// Read all records from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Read records matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

/// Find all tournament directories known to the store.
pub fn list_tournaments(config: &StorageConfig) -> Result<Vec<TournamentId>, StorageError> {
    let dir = config.tournaments_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut tournaments = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                tournaments.push(TournamentId::from(name));
            }
        }
    }

    tournaments.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(tournaments)
}

/// JSONL-backed [`TournamentStore`].
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn reader<T: DeserializeOwned>(
        &self,
        record: RecordFile,
        tournament_id: &TournamentId,
    ) -> JsonlReader<T> {
        JsonlReader::for_tournament(&self.config, record, tournament_id)
    }

    fn writer<T: Serialize>(
        &self,
        record: RecordFile,
        tournament_id: &TournamentId,
    ) -> JsonlWriter<T> {
        JsonlWriter::for_tournament(&self.config, record, tournament_id)
    }

    /// Replace the record whose ID matches, rewriting the file.
    fn replace<T, F>(
        &self,
        record: RecordFile,
        tournament_id: &TournamentId,
        id: &str,
        id_of: F,
        updated: T,
    ) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> &str,
    {
        let mut records: Vec<T> = self.reader(record, tournament_id).read_all()?;
        let slot = records
            .iter_mut()
            .find(|r| id_of(r) == id)
            .ok_or_else(|| StorageError::MissingRecord(id.to_string()))?;
        *slot = updated;
        self.writer(record, tournament_id).write_all(&records)?;
        Ok(())
    }

    /// Search every tournament directory for a record matching the
    /// predicate. Lookups by bare pairing/round/participant ID land here.
    fn find_across_tournaments<T, F>(
        &self,
        record: RecordFile,
        predicate: F,
    ) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        for tournament_id in list_tournaments(&self.config)? {
            let reader: JsonlReader<T> = self.reader(record, &tournament_id);
            if let Some(found) = reader.read_all()?.into_iter().find(|r| predicate(r)) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl TournamentStore for JsonlStore {
    async fn participants(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Participant>, StorageError> {
        self.reader(RecordFile::Participants, tournament_id)
            .read_all()
    }

    async fn participants_by_status(
        &self,
        tournament_id: &TournamentId,
        status: ParticipationStatus,
    ) -> Result<Vec<Participant>, StorageError> {
        self.reader(RecordFile::Participants, tournament_id)
            .read_where(|p: &Participant| p.participation_status == status)
    }

    async fn participant(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<Option<Participant>, StorageError> {
        self.find_across_tournaments(RecordFile::Participants, |p: &Participant| {
            p.id == *participant_id
        })
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), StorageError> {
        self.writer(RecordFile::Participants, &participant.tournament_id)
            .append(participant)
    }

    async fn update_participant(&self, participant: &Participant) -> Result<(), StorageError> {
        self.replace(
            RecordFile::Participants,
            &participant.tournament_id,
            participant.id.as_str(),
            |p: &Participant| p.id.as_str(),
            participant.clone(),
        )
    }

    async fn remove_participant(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<(), StorageError> {
        let Some(participant) = self.participant(participant_id).await? else {
            return Err(StorageError::MissingRecord(
                participant_id.as_str().to_string(),
            ));
        };

        let remaining: Vec<Participant> = self
            .reader(RecordFile::Participants, &participant.tournament_id)
            .read_where(|p: &Participant| p.id != *participant_id)?;
        self.writer(RecordFile::Participants, &participant.tournament_id)
            .write_all(&remaining)?;
        Ok(())
    }

    async fn insert_round(&self, round: &Round) -> Result<(), StorageError> {
        self.writer(RecordFile::Rounds, &round.tournament_id)
            .append(round)
    }

    async fn update_round(&self, round: &Round) -> Result<(), StorageError> {
        self.replace(
            RecordFile::Rounds,
            &round.tournament_id,
            round.id.as_str(),
            |r: &Round| r.id.as_str(),
            round.clone(),
        )
    }

    async fn round(&self, round_id: &RoundId) -> Result<Option<Round>, StorageError> {
        self.find_across_tournaments(RecordFile::Rounds, |r: &Round| r.id == *round_id)
    }

    async fn round_by_number(
        &self,
        tournament_id: &TournamentId,
        round_number: u32,
    ) -> Result<Option<Round>, StorageError> {
        let rounds: Vec<Round> = self
            .reader(RecordFile::Rounds, tournament_id)
            .read_where(|r: &Round| r.round_number == round_number)?;
        Ok(rounds.into_iter().min_by_key(|r| r.created_at))
    }

    async fn insert_pairings(&self, pairings: &[Pairing]) -> Result<(), StorageError> {
        let Some(first) = pairings.first() else {
            return Ok(());
        };
        self.writer(RecordFile::Pairings, &first.tournament_id)
            .append_batch(pairings)?;
        Ok(())
    }

    async fn update_pairing(&self, pairing: &Pairing) -> Result<(), StorageError> {
        self.replace(
            RecordFile::Pairings,
            &pairing.tournament_id,
            pairing.id.as_str(),
            |p: &Pairing| p.id.as_str(),
            pairing.clone(),
        )
    }

    async fn pairing(&self, pairing_id: &PairingId) -> Result<Option<Pairing>, StorageError> {
        self.find_across_tournaments(RecordFile::Pairings, |p: &Pairing| p.id == *pairing_id)
    }

    async fn round_pairings(
        &self,
        tournament_id: &TournamentId,
        round_id: &RoundId,
    ) -> Result<Vec<Pairing>, StorageError> {
        let mut pairings: Vec<Pairing> = self
            .reader(RecordFile::Pairings, tournament_id)
            .read_where(|p: &Pairing| p.round_id == *round_id)?;
        pairings.sort_by_key(|p| p.table_number);
        Ok(pairings)
    }

    async fn tournament_pairings(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Pairing>, StorageError> {
        self.reader(RecordFile::Pairings, tournament_id).read_all()
    }

    async fn rounds(&self, tournament_id: &TournamentId) -> Result<Vec<Round>, StorageError> {
        let mut rounds: Vec<Round> = self.reader(RecordFile::Rounds, tournament_id).read_all()?;
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }
}
