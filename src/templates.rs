// Template store: the list of saved status presets, kept in a JSON file
// shaped as `{ "templates": [...] }`. The file is read fresh on every use
// and rewritten in full on every change.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A named, reusable status preset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusTemplate {
    pub label: String,
    pub text: String,
    pub emoji: String,
    /// Kept as the JSON number that was read, so `60` is written back as
    /// `60` and `7.5` as `7.5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_minutes: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until_time: Option<String>,
    /// Keys this tool does not know about, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusTemplate {
    /// Template without any expiration policy.
    pub fn new(label: impl Into<String>, text: impl Into<String>, emoji: impl Into<String>) -> Self {
        StatusTemplate {
            label: label.into(),
            text: text.into(),
            emoji: emoji.into(),
            duration_in_minutes: None,
            until_time: None,
            extra: Map::new(),
        }
    }

    /// Expire `minutes` after the status is set.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_in_minutes = Some(Number::from(minutes));
        self
    }

    /// Expire at `HH:MM` on the day the status is set.
    pub fn with_until_time(mut self, until: impl Into<String>) -> Self {
        self.until_time = Some(until.into());
        self
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_in_minutes.as_ref().and_then(Number::as_f64)
    }
}

#[derive(Serialize, Deserialize, Default)]
struct TemplateFile {
    /// `null` reads the same as a missing key.
    #[serde(default)]
    templates: Option<Vec<StatusTemplate>>,
}

/// Handle on the templates file.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TemplateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every template. A missing or unparsable file is an error, never
    /// an empty list; a file without a `templates` key (or with `null`) is.
    pub fn load(&self) -> Result<Vec<StatusTemplate>, AppError> {
        let data = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AppError::TemplatesMissing {
                    path: self.path.clone(),
                }
            } else {
                AppError::TemplatesRead {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let file: TemplateFile =
            serde_json::from_str(&data).map_err(|source| AppError::TemplatesInvalid {
                path: self.path.clone(),
                source,
            })?;
        let templates = file.templates.unwrap_or_default();
        log::debug!(
            "loaded {} templates from {}",
            templates.len(),
            self.path.display()
        );
        Ok(templates)
    }

    /// Overwrite the file with `templates`.
    pub fn save(&self, templates: &[StatusTemplate]) -> Result<(), AppError> {
        let file = TemplateFile {
            templates: Some(templates.to_vec()),
        };
        let body = serde_json::to_string_pretty(&file).map_err(AppError::TemplatesEncode)?;
        fs::write(&self.path, body).map_err(|source| AppError::TemplatesWrite {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "saved {} templates to {}",
            templates.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Append `template` and persist the whole collection.
    pub fn create(&self, template: StatusTemplate) -> Result<(), AppError> {
        let mut templates = self.load()?;
        templates.push(template);
        self.save(&templates)
    }

    /// Remove every template labelled `label`, returning how many went away.
    /// The file is rewritten even when nothing matched.
    pub fn delete(&self, label: &str) -> Result<usize, AppError> {
        let mut templates = self.load()?;
        let removed = remove_by_label(&mut templates, label);
        self.save(&templates)?;
        Ok(removed)
    }
}

/// Drop all entries whose label equals `label`, keeping the order of the rest.
pub fn remove_by_label(templates: &mut Vec<StatusTemplate>, label: &str) -> usize {
    let before = templates.len();
    templates.retain(|t| t.label != label);
    before - templates.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, body: &str) -> TemplateStore {
        let path = dir.path().join("templates.json");
        fs::write(&path, body).unwrap();
        TemplateStore::new(path)
    }

    fn lunch() -> StatusTemplate {
        StatusTemplate::new("Lunch", "Out for lunch", ":lunch:").with_duration(60)
    }

    #[test]
    fn loads_templates_with_optional_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            r#"{"templates": [
                {"label": "Lunch", "text": "Out for lunch", "emoji": ":lunch:", "durationInMinutes": 60},
                {"label": "Focus", "text": "Heads down", "emoji": ":headphones:", "untilTime": "17:00"}
            ]}"#,
        );
        let templates = store.load().unwrap();
        assert_eq!(templates[0], lunch());
        assert_eq!(templates[1].until_time.as_deref(), Some("17:00"));
        assert_eq!(templates[1].duration_in_minutes, None);
    }

    #[test]
    fn missing_key_means_no_templates() {
        let dir = TempDir::new().unwrap();
        assert!(store_with(&dir, "{}").load().unwrap().is_empty());
        assert!(store_with(&dir, r#"{"templates": null}"#)
            .load()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn fractional_durations_load_and_save_unchanged() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"templates":[
            {"label":"Coffee","text":"Coffee","emoji":":coffee:","durationInMinutes":7.5},
            {"label":"Blink","text":"Brb","emoji":":eyes:","durationInMinutes":0.5},
            {"label":"Lunch","text":"Out for lunch","emoji":":lunch:","durationInMinutes":60}
        ]}"#;
        let store = store_with(&dir, original);
        let templates = store.load().unwrap();
        assert_eq!(templates[0].duration_minutes(), Some(7.5));
        assert_eq!(templates[1].duration_minutes(), Some(0.5));
        assert_eq!(templates[2].duration_minutes(), Some(60.0));

        store.save(&templates).unwrap();
        let written = fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("\"durationInMinutes\": 60\n"));
        assert!(!written.contains("60.0"));
        let written: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(written, serde_json::from_str::<Value>(original).unwrap());
    }

    #[test]
    fn unknown_keys_survive_other_edits() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            r#"{"templates":[{"label":"L","text":"t","emoji":":e:","note":"keep me","tags":["a"]}]}"#,
        );
        store.create(StatusTemplate::new("M", "u", ":f:")).unwrap();
        store.delete("M").unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(written["templates"][0]["note"], "keep me");
        assert_eq!(written["templates"][0]["tags"][0], "a");
        assert_eq!(written["templates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_or_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = TemplateStore::new(dir.path().join("nope.json"));
        assert!(matches!(
            missing.load(),
            Err(AppError::TemplatesMissing { .. })
        ));

        let broken = store_with(&dir, "[not json");
        assert!(matches!(
            broken.load(),
            Err(AppError::TemplatesInvalid { .. })
        ));
    }

    #[test]
    fn saving_what_was_loaded_keeps_the_structure() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"templates":[{"label":"Lunch","text":"Out for lunch","emoji":":lunch:","durationInMinutes":60},{"label":"Gone","text":"Away","emoji":":x:","untilTime":"9:30"}]}"#;
        let store = store_with(&dir, original);
        store.save(&store.load().unwrap()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let expected: Value = serde_json::from_str(original).unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn created_template_has_only_supplied_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, r#"{"templates": []}"#);
        store
            .create(StatusTemplate::new("Meeting", "In a meeting", ":calendar:"))
            .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let entry = &written["templates"][0];
        assert_eq!(entry["label"], "Meeting");
        assert!(entry.get("durationInMinutes").is_none());
        assert!(entry.get("untilTime").is_none());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_every_entry_with_the_label() {
        let mut templates = vec![
            lunch(),
            StatusTemplate::new("Focus", "Heads down", ":headphones:"),
            StatusTemplate::new("Lunch", "Second lunch", ":burrito:"),
            StatusTemplate::new("Commute", "On the train", ":train:"),
        ];
        assert_eq!(remove_by_label(&mut templates, "Lunch"), 2);
        let labels: Vec<_> = templates.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Focus", "Commute"]);

        assert_eq!(remove_by_label(&mut templates, "Holiday"), 0);
        assert_eq!(templates.len(), 2);
    }

    #[test]
    fn deleting_the_only_template_leaves_an_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "{}");
        store.save(&[lunch()]).unwrap();

        assert_eq!(store.delete("Lunch").unwrap(), 1);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = TemplateStore::new(dir.path().join("missing-dir").join("templates.json"));
        assert!(matches!(
            store.save(&[lunch()]),
            Err(AppError::TemplatesWrite { .. })
        ));
    }
}
