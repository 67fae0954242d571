//! Save Document Codec
//!
//! Converts a [`QuestLedger`] to and from its JSON save document.
//!
//! Legacy documents carry no type information, so each goal's kind is
//! inferred from which fields are present (see [`resolve_legacy_kind`]).
//! Tagged documents name the kind explicitly.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::format::{SaveFormat, TAGGED_FORMAT_VERSION};
use crate::error::{QuestError, RecordPosition, Result};
use crate::goal::{ChecklistProgress, Goal, GoalKind, GoalKindTag, QuestLedger};

/// Points value the legacy loader treats as "this is an eternal goal"
pub const LEGACY_ETERNAL_POINTS: u32 = 100;

// ============================================================================
// Written Structures
// ============================================================================

#[derive(Debug, Serialize)]
struct SaveDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    score: u64,
    goals: Vec<GoalRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct GoalRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<GoalKindTag>,
    name: &'a str,
    points: u32,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bonus_points: Option<u32>,
}

impl<'a> GoalRecord<'a> {
    fn from_goal(goal: &'a Goal, format: SaveFormat) -> Self {
        let progress = goal.checklist_progress();
        Self {
            kind: match format {
                SaveFormat::Legacy => None,
                SaveFormat::Tagged => Some(goal.kind_tag()),
            },
            name: goal.name(),
            points: goal.points(),
            completed: goal.is_completed(),
            current_count: progress.map(|p| p.current_count),
            target_count: progress.map(|p| p.target_count),
            bonus_points: progress.map(|p| p.bonus_points),
        }
    }
}

// ============================================================================
// Raw Read Structures
// ============================================================================

/// Top-level document as read. Goals stay untyped here so that a bad goal
/// can be reported with its position.
#[derive(Debug, Deserialize)]
struct RawSaveDocument {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default, alias = "Score")]
    score: Option<u64>,
    #[serde(default, alias = "Goals")]
    goals: Option<Vec<Value>>,
}

/// One goal record as read. Field names written by the legacy program are
/// accepted as aliases.
#[derive(Debug, Deserialize)]
struct RawGoalRecord {
    #[serde(default)]
    kind: Option<GoalKindTag>,
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Points")]
    points: u32,
    #[serde(alias = "Completed")]
    completed: bool,
    #[serde(default, alias = "CurrentCount")]
    current_count: Option<u32>,
    #[serde(default, alias = "TargetCount")]
    target_count: Option<u32>,
    #[serde(default, alias = "BonusPoints")]
    bonus_points: Option<u32>,
}

// ============================================================================
// Encoding
// ============================================================================

fn document(ledger: &QuestLedger, format: SaveFormat) -> SaveDocument<'_> {
    SaveDocument {
        version: format.version(),
        score: ledger.score(),
        goals: ledger
            .goals()
            .iter()
            .map(|goal| GoalRecord::from_goal(goal, format))
            .collect(),
    }
}

/// Serialize a ledger to a pretty-printed JSON document
pub fn encode(ledger: &QuestLedger, format: SaveFormat) -> Result<String> {
    Ok(serde_json::to_string_pretty(&document(ledger, format))?)
}

pub fn write_ledger<W: Write>(ledger: &QuestLedger, mut writer: W, format: SaveFormat) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &document(ledger, format))?;
    writer.flush()?;
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

pub fn read_ledger<R: Read>(mut reader: R) -> Result<QuestLedger> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    decode(&contents)
}

/// Rebuild a ledger from a save document.
///
/// Any malformed goal fails the whole decode; nothing is partially restored.
pub fn decode(contents: &str) -> Result<QuestLedger> {
    let value: Value = serde_json::from_str(contents)?;
    require_object(&value, RecordPosition::Document)?;
    let raw = RawSaveDocument::deserialize(value)
        .map_err(|e| QuestError::malformed(RecordPosition::Document, e.to_string()))?;

    let tagged = match raw.version {
        None => false,
        Some(TAGGED_FORMAT_VERSION) => true,
        Some(other) => return Err(QuestError::UnsupportedVersion(other)),
    };

    let score = raw
        .score
        .ok_or_else(|| QuestError::malformed(RecordPosition::Document, "missing field `score`"))?;
    let records = raw
        .goals
        .ok_or_else(|| QuestError::malformed(RecordPosition::Document, "missing field `goals`"))?;

    let goals = records
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_goal(value, RecordPosition::Goal(index), tagged))
        .collect::<Result<Vec<_>>>()?;

    debug!("Decoded {} goals (score {}, tagged: {})", goals.len(), score, tagged);
    Ok(QuestLedger::from_parts(goals, score))
}

/// Derived struct visitors also accept arrays (fields by position), so
/// records are checked to be JSON objects before they are deserialized.
fn require_object(value: &Value, position: RecordPosition) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(QuestError::malformed(position, "expected an object"))
    }
}

fn decode_goal(value: Value, position: RecordPosition, tagged: bool) -> Result<Goal> {
    require_object(&value, position)?;
    let record = RawGoalRecord::deserialize(value)
        .map_err(|e| QuestError::malformed(position, e.to_string()))?;

    if record.name.trim().is_empty() {
        return Err(QuestError::malformed(position, "goal name is empty"));
    }

    let tag = match (record.kind, tagged) {
        (Some(tag), _) => tag,
        (None, true) => return Err(QuestError::malformed(position, "missing field `kind`")),
        (None, false) => resolve_legacy_kind(&record),
    };

    let kind = match tag {
        GoalKindTag::Simple => GoalKind::Simple,
        GoalKindTag::Eternal => GoalKind::Eternal,
        GoalKindTag::Checklist => GoalKind::Checklist(checklist_progress(&record, position)?),
    };

    let completed = normalized_completed(&record, &kind, position);
    Ok(Goal::restore(record.name, record.points, completed, kind))
}

/// Pick a goal kind for an untagged record the way the legacy program did:
/// a `current_count` field means checklist, exactly 100 points means
/// eternal, anything else is simple.
///
/// This misreads any simple goal worth 100 points as eternal. Saved data
/// depends on it, so it is kept as-is; use [`SaveFormat::Tagged`] to avoid it.
fn resolve_legacy_kind(record: &RawGoalRecord) -> GoalKindTag {
    if record.current_count.is_some() {
        GoalKindTag::Checklist
    } else if record.points == LEGACY_ETERNAL_POINTS {
        debug!(
            "Goal '{}' has no checklist fields and {} points, restoring as eternal",
            record.name, LEGACY_ETERNAL_POINTS
        );
        GoalKindTag::Eternal
    } else {
        GoalKindTag::Simple
    }
}

fn checklist_progress(record: &RawGoalRecord, position: RecordPosition) -> Result<ChecklistProgress> {
    let require = |field: Option<u32>, name: &str| {
        field.ok_or_else(|| {
            QuestError::malformed(position, format!("checklist record missing field `{}`", name))
        })
    };

    let mut progress = ChecklistProgress {
        current_count: require(record.current_count, "current_count")?,
        target_count: require(record.target_count, "target_count")?,
        bonus_points: require(record.bonus_points, "bonus_points")?,
    };

    if progress.target_count == 0 {
        return Err(QuestError::malformed(position, "checklist target_count must be at least 1"));
    }
    // The legacy program kept counting past the target
    if progress.current_count > progress.target_count {
        warn!(
            "{} ('{}'): current_count {} exceeds target_count {}, capping",
            position, record.name, progress.current_count, progress.target_count
        );
        progress.current_count = progress.target_count;
    }
    Ok(progress)
}

/// Bring the stored completed flag in line with the goal kind
fn normalized_completed(record: &RawGoalRecord, kind: &GoalKind, position: RecordPosition) -> bool {
    let expected = match kind {
        GoalKind::Simple => return record.completed,
        GoalKind::Eternal => false,
        GoalKind::Checklist(progress) => progress.is_done(),
    };
    if record.completed != expected {
        warn!(
            "{} ('{}'): stored completed={} does not match its {} state, using {}",
            position,
            record.name,
            record.completed,
            kind.tag().as_str(),
            expected
        );
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> QuestLedger {
        let mut ledger = QuestLedger::new();
        ledger.add_goal(Goal::simple("Run a marathon", 1000).unwrap());
        ledger.add_goal(Goal::eternal("Read scriptures", 100).unwrap());
        ledger.add_goal(Goal::checklist("Attend temple", 50, 10, 500).unwrap());
        ledger.record_event(0);
        ledger.record_event(1);
        ledger.record_event(2);
        ledger
    }

    fn assert_malformed_at(err: QuestError, expected: RecordPosition) {
        match err {
            QuestError::MalformedRecord { position, .. } => assert_eq!(position, expected),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_round_trip() {
        let ledger = sample_ledger();
        let json = encode(&ledger, SaveFormat::Legacy).unwrap();
        let restored = decode(&json).unwrap();

        assert_eq!(restored, ledger);
        assert_eq!(restored.score(), 1150);
        assert_eq!(restored.level(), 4);
    }

    #[test]
    fn test_tagged_round_trip() {
        let ledger = sample_ledger();
        let json = encode(&ledger, SaveFormat::Tagged).unwrap();
        assert_eq!(decode(&json).unwrap(), ledger);
    }

    #[test]
    fn test_legacy_document_shape() {
        let json = encode(&sample_ledger(), SaveFormat::Legacy).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("version").is_none());
        assert_eq!(value["score"], 1150);

        let goals = value["goals"].as_array().unwrap();
        assert_eq!(goals.len(), 3);
        assert!(goals[0].get("kind").is_none());
        assert_eq!(goals[0]["name"], "Run a marathon");
        assert_eq!(goals[0]["completed"], true);
        // Only checklist records carry the counters
        assert!(goals[0].get("current_count").is_none());
        assert!(goals[1].get("target_count").is_none());
        assert_eq!(goals[2]["current_count"], 1);
        assert_eq!(goals[2]["target_count"], 10);
        assert_eq!(goals[2]["bonus_points"], 500);
    }

    #[test]
    fn test_tagged_document_shape() {
        let json = encode(&sample_ledger(), SaveFormat::Tagged).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 2);
        assert_eq!(value["goals"][0]["kind"], "simple");
        assert_eq!(value["goals"][1]["kind"], "eternal");
        assert_eq!(value["goals"][2]["kind"], "checklist");
    }

    #[test]
    fn test_legacy_hundred_point_simple_goal_reloads_as_eternal() {
        let mut ledger = QuestLedger::new();
        ledger.add_goal(Goal::simple("Clean the garage", 100).unwrap());
        ledger.add_goal(Goal::simple("Fix the bike", 99).unwrap());

        let restored = decode(&encode(&ledger, SaveFormat::Legacy).unwrap()).unwrap();

        assert_eq!(restored.goals()[0].kind_tag(), GoalKindTag::Eternal);
        assert_eq!(restored.goals()[1].kind_tag(), GoalKindTag::Simple);
        assert_ne!(restored, ledger);

        // Tagged documents keep the real kind
        let restored = decode(&encode(&ledger, SaveFormat::Tagged).unwrap()).unwrap();
        assert_eq!(restored.goals()[0].kind_tag(), GoalKindTag::Simple);
    }

    #[test]
    fn test_legacy_completed_hundred_point_goal_restores_as_open_eternal() {
        let json = r#"{"score": 100, "goals": [
            {"name": "Clean the garage", "points": 100, "completed": true}
        ]}"#;
        let mut restored = decode(json).unwrap();
        let goal = &restored.goals()[0];
        assert_eq!(goal.kind_tag(), GoalKindTag::Eternal);
        assert!(!goal.is_completed());

        // It now pays out on every event
        assert_eq!(restored.try_record_event(0), Some(100));
        assert_eq!(restored.try_record_event(0), Some(100));
    }

    #[test]
    fn test_reads_legacy_pascal_case_fields() {
        let json = r#"{
            "Score": 650,
            "Goals": [
                {"Name": "Run a marathon", "Points": 1000, "Completed": false},
                {"Name": "Read scriptures", "Points": 100, "Completed": false},
                {"Name": "Attend temple", "Points": 50, "Completed": false,
                 "TargetCount": 10, "CurrentCount": 3, "BonusPoints": 500}
            ]
        }"#;
        let ledger = decode(json).unwrap();

        assert_eq!(ledger.score(), 650);
        assert_eq!(ledger.level(), 3);
        assert_eq!(ledger.goals()[0].kind_tag(), GoalKindTag::Simple);
        assert_eq!(ledger.goals()[1].kind_tag(), GoalKindTag::Eternal);
        let progress = ledger.goals()[2].checklist_progress().unwrap();
        assert_eq!(progress.current_count, 3);
        assert_eq!(progress.target_count, 10);
        assert_eq!(progress.bonus_points, 500);
    }

    #[test]
    fn test_missing_score_is_malformed() {
        let err = decode(r#"{"goals": []}"#).unwrap_err();
        assert_malformed_at(err, RecordPosition::Document);
    }

    #[test]
    fn test_missing_goals_is_malformed() {
        let err = decode(r#"{"score": 10}"#).unwrap_err();
        assert_malformed_at(err, RecordPosition::Document);
    }

    #[test]
    fn test_missing_common_field_names_record() {
        let json = r#"{"score": 0, "goals": [
            {"name": "Fine", "points": 5, "completed": false},
            {"name": "No points", "completed": false}
        ]}"#;
        let err = decode(json).unwrap_err();
        assert!(err.to_string().contains("points"));
        assert_malformed_at(err, RecordPosition::Goal(1));
    }

    #[test]
    fn test_checklist_missing_target_is_malformed() {
        let json = r#"{"score": 0, "goals": [
            {"name": "Pushups", "points": 5, "completed": false,
             "current_count": 1, "bonus_points": 10}
        ]}"#;
        let err = decode(json).unwrap_err();
        assert!(err.to_string().contains("target_count"));
        assert_malformed_at(err, RecordPosition::Goal(0));
    }

    #[test]
    fn test_checklist_count_past_target_is_capped() {
        let json = r#"{"Score": 1050, "Goals": [
            {"Name": "Attend temple", "Points": 50, "Completed": true,
             "CurrentCount": 11, "TargetCount": 10, "BonusPoints": 500}
        ]}"#;
        let mut ledger = decode(json).unwrap();
        let goal = &ledger.goals()[0];
        assert!(goal.is_completed());
        let progress = goal.checklist_progress().unwrap();
        assert_eq!(progress.current_count, 10);
        assert_eq!(progress.target_count, 10);

        // Capped and finished, so nothing more is awarded
        assert_eq!(ledger.try_record_event(0), Some(0));
        assert_eq!(ledger.goals()[0].checklist_progress().unwrap().current_count, 10);
    }

    #[test]
    fn test_array_document_is_malformed() {
        let err = decode(r#"[null, 5, [[null, "Pushups", 7, false]]]"#).unwrap_err();
        assert_malformed_at(err, RecordPosition::Document);
    }

    #[test]
    fn test_array_goal_record_is_malformed() {
        let json = r#"{"score": 7, "goals": [
            {"name": "Fine", "points": 5, "completed": false},
            [null, "Pushups", 7, false]
        ]}"#;
        let err = decode(json).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
        assert_malformed_at(err, RecordPosition::Goal(1));
    }

    #[test]
    fn test_scalar_document_is_malformed() {
        assert_malformed_at(decode("5").unwrap_err(), RecordPosition::Document);
    }

    #[test]
    fn test_negative_points_is_malformed() {
        let json = r#"{"score": 0, "goals": [
            {"name": "Oops", "points": -5, "completed": false}
        ]}"#;
        assert_malformed_at(decode(json).unwrap_err(), RecordPosition::Goal(0));
    }

    #[test]
    fn test_checklist_completed_flag_rederived() {
        let json = r#"{"score": 0, "goals": [
            {"name": "Pushups", "points": 5, "completed": false,
             "current_count": 3, "target_count": 3, "bonus_points": 10}
        ]}"#;
        let mut ledger = decode(json).unwrap();
        assert!(ledger.goals()[0].is_completed());
        assert_eq!(ledger.try_record_event(0), Some(0));
    }

    #[test]
    fn test_tagged_record_without_kind_is_malformed() {
        let json = r#"{"version": 2, "score": 0, "goals": [
            {"name": "Pushups", "points": 100, "completed": false}
        ]}"#;
        assert_malformed_at(decode(json).unwrap_err(), RecordPosition::Goal(0));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = decode(r#"{"version": 7, "score": 0, "goals": []}"#).unwrap_err();
        assert!(matches!(err, QuestError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(decode("score = 5"), Err(QuestError::Json(_))));
    }

    #[test]
    fn test_writer_and_reader() {
        let ledger = sample_ledger();
        let mut buffer = Vec::new();
        write_ledger(&ledger, &mut buffer, SaveFormat::Legacy).unwrap();

        let restored = read_ledger(buffer.as_slice()).unwrap();
        assert_eq!(restored, ledger);
    }
}
