use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use log::debug;

use cobind_core::errors::CobindError;
use cobind_core::models::Region;
use cobind_core::traits::SignalStore;
use cobind_core::utils::{is_skippable_line, open_reader};

///
/// Read-hit counts for one factor, backed by a BED-like alignment file.
///
/// Each read contributes its 5' end: `start + 1` for `+` or unstranded reads,
/// `end` for `-` reads (BED starts are 0-based, ends exclusive). Positions are
/// kept sorted per chromosome so a count is two binary searches.
///
pub struct ReadHitStore {
    name: String,
    hits: Option<FxHashMap<String, Vec<u32>>>,
}

fn parse_read_line(line: &str) -> Result<(String, u32), String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(format!("expected at least 3 columns, found {}", fields.len()));
    }

    let start: u32 = fields[1]
        .trim()
        .parse()
        .map_err(|e| format!("start `{}`: {}", fields[1], e))?;
    let end: u32 = fields[2]
        .trim()
        .parse()
        .map_err(|e| format!("end `{}`: {}", fields[2], e))?;

    let five_prime = match fields.get(5).map(|s| s.trim()) {
        Some("-") => end,
        _ => start
            .checked_add(1)
            .ok_or_else(|| format!("start `{}` is past the last representable position", start))?,
    };

    Ok((fields[0].to_string(), five_prime))
}

impl ReadHitStore {
    ///
    /// Index every read in `reader`. `name` only labels errors and log lines.
    ///
    pub fn from_reader<R: BufRead>(name: &str, reader: R) -> Result<ReadHitStore, CobindError> {
        let mut hits: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut n_reads: usize = 0;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if is_skippable_line(&line)
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            let (chr, pos) = parse_read_line(line.trim_end()).map_err(|reason| {
                CobindError::Parse(format!("reads for `{}`, line {}: {}", name, idx + 1, reason))
            })?;
            hits.entry(chr).or_default().push(pos);
            n_reads += 1;
        }

        for positions in hits.values_mut() {
            positions.sort_unstable();
        }

        debug!("Indexed {} reads for {}", n_reads, name);

        Ok(ReadHitStore {
            name: name.to_string(),
            hits: Some(hits),
        })
    }

    /// Open the store at `path` (plain or gzipped BED).
    pub fn open(path: &Path) -> Result<ReadHitStore, CobindError> {
        let reader = open_reader(path)?;
        ReadHitStore::from_reader(&path.to_string_lossy(), reader)
    }

    pub fn is_open(&self) -> bool {
        self.hits.is_some()
    }
}

impl SignalStore for ReadHitStore {
    fn count_hits(&self, region: &Region) -> Result<u64, CobindError> {
        let hits = self.hits.as_ref().ok_or_else(|| CobindError::LookupFailure {
            source_name: self.name.clone(),
            region: region.to_string(),
            reason: "store is closed".to_string(),
        })?;

        let Some(positions) = hits.get(&region.chr) else {
            return Ok(0);
        };

        let lo = positions.partition_point(|p| *p < region.start);
        let hi = positions.partition_point(|p| *p <= region.end);
        Ok((hi - lo) as u64)
    }

    fn close(&mut self) {
        if self.hits.take().is_some() {
            debug!("Closed read store {}", self.name);
        }
    }
}

/// Resolve a signal locator relative to the roster file's directory.
pub fn resolve_locator(locator: &str, base: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(locator);
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}
