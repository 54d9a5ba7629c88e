use std::io::BufRead;
use std::path::Path;

use crate::errors::CobindError;
use crate::utils::get_dynamic_reader;

///
/// One configured factor: the experiment directory holding its peak calls,
/// a display name and a locator for its quantitative-signal store.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    pub experiment: String,
    pub name: String,
    pub signal_locator: String,
}

///
/// The ordered list of factors for a run. A factor's position in the roster
/// is its `factor_id` everywhere downstream.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorRoster {
    pub factors: Vec<Factor>,
}

impl FactorRoster {
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, factor_id: usize) -> Option<&Factor> {
        self.factors.get(factor_id)
    }

    pub fn name(&self, factor_id: usize) -> Option<&str> {
        self.get(factor_id).map(|f| f.name.as_str())
    }

    ///
    /// Parse a roster from tab-separated text: `experiment\tname\tsignal_locator`.
    ///
    pub fn parse<R: BufRead>(reader: R) -> Result<FactorRoster, CobindError> {
        let mut factors = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end();
            if trimmed.trim().is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split('\t').map(|f| f.trim()).collect();
            if fields.len() < 3 || fields[..3].iter().any(|f| f.is_empty()) {
                return Err(CobindError::Configuration(format!(
                    "factor roster line {} needs experiment, name and signal locator: `{}`",
                    idx + 1,
                    trimmed
                )));
            }

            factors.push(Factor {
                experiment: fields[0].to_string(),
                name: fields[1].to_string(),
                signal_locator: fields[2].to_string(),
            });
        }

        if factors.is_empty() {
            return Err(CobindError::Configuration(
                "factor roster is empty".to_string(),
            ));
        }

        Ok(FactorRoster { factors })
    }
}

impl TryFrom<&Path> for FactorRoster {
    type Error = CobindError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let reader = get_dynamic_reader(path).map_err(|e| {
            CobindError::Configuration(format!("can't read factor roster {:?}: {}", path, e))
        })?;
        FactorRoster::parse(reader)
    }
}
