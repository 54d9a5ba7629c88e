//! Reader for per-factor binding event calls (GEM `_GEM_events.txt` and the
//! older GPS `_GPS_significant.txt` layout).

use std::io::BufRead;
use std::path::Path;

use cobind_core::errors::CobindError;
use cobind_core::models::GenomicPoint;
use cobind_core::utils::{is_skippable_line, open_reader};

/// k-mer column value written by the peak caller when no motif supports the event.
const NO_MOTIF_MARKER: &str = "------";

/// One raw binding event as reported by the peak caller.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingEvent {
    pub coordinate: GenomicPoint,
    pub strength: f64,
    pub has_motif: bool,
}

#[derive(Debug)]
struct EventColumns {
    strength: usize,
    kmer: Option<usize>,
}

impl Default for EventColumns {
    fn default() -> Self {
        EventColumns {
            strength: 1,
            kmer: None,
        }
    }
}

impl EventColumns {
    fn from_header(fields: &[&str]) -> EventColumns {
        let strength = fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case("IP"))
            .unwrap_or(1);
        let kmer = fields.iter().position(|f| f.starts_with("Kmer"));
        EventColumns { strength, kmer }
    }
}

fn is_header(fields: &[&str]) -> bool {
    fields
        .first()
        .is_some_and(|f| f.eq_ignore_ascii_case("Position"))
}

///
/// Parse binding events from tab-separated text, keeping file order.
///
/// A header whose first column is `Position` locates the `IP` (strength) and
/// `Kmer*` columns. Without a header the second column is the strength and no
/// event carries a motif.
///
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<BindingEvent>, CobindError> {
    let mut events = Vec::new();
    let mut columns: Option<EventColumns> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable_line(&line) {
            continue;
        }

        let fields: Vec<&str> = line.trim_end().split('\t').collect();

        if columns.is_none() && is_header(&fields) {
            columns = Some(EventColumns::from_header(&fields));
            continue;
        }
        let cols = columns.get_or_insert_with(EventColumns::default);

        let coordinate: GenomicPoint = fields[0]
            .parse()
            .map_err(|e| CobindError::Parse(format!("event line {}: {}", idx + 1, e)))?;

        let strength = fields
            .get(cols.strength)
            .ok_or_else(|| {
                CobindError::Parse(format!("event line {}: missing strength column", idx + 1))
            })?
            .trim()
            .parse::<f64>()
            .map_err(|e| CobindError::Parse(format!("event line {} strength: {}", idx + 1, e)))?;

        let has_motif = cols
            .kmer
            .and_then(|k| fields.get(k))
            .is_some_and(|kmer| !kmer.contains(NO_MOTIF_MARKER));

        events.push(BindingEvent {
            coordinate,
            strength,
            has_motif,
        });
    }

    Ok(events)
}

/// Read an event file from disk (optionally gzipped).
pub fn read_events(path: &Path) -> Result<Vec<BindingEvent>, CobindError> {
    let reader = open_reader(path)?;
    parse_events(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const GEM_EVENTS: &str = "\
Position\tIP\tControl\tFold\tExpectd\tQ_-lg10\tP_-lg10\tP_poiss\tIPvsEMP\tNoise\tKmerGroup\tMotifId\tKG_score\tStrand
chr1:1000\t120.4\t3.0\t40.1\t1.2\t99.0\t99.0\t99.0\t1.0\t0.1\tCCACTAGG/CCTAGTGG\t0\t12.3\t+
chr1:1040\t55.0\t1.0\t55.0\t1.2\t50.0\t50.0\t50.0\t1.0\t0.1\t------\t-1\t0.0\t*
";

    #[rstest]
    fn test_parse_gem_events() {
        let events = parse_events(Cursor::new(GEM_EVENTS)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].coordinate, GenomicPoint::new("chr1", 1000));
        assert_eq!(events[0].strength, 120.4);
        assert_eq!(events[0].has_motif, true);
        assert_eq!(events[1].has_motif, false);
    }

    #[rstest]
    fn test_parse_headerless_events() {
        let events = parse_events(Cursor::new("chr2:77\t8\n\nchr2:10\t3.5\n")).unwrap();
        let offsets: Vec<u32> = events.iter().map(|e| e.coordinate.offset).collect();
        assert_eq!(offsets, vec![77, 10]);
        assert!(events.iter().all(|e| !e.has_motif));
    }

    #[rstest]
    #[case("Position\tIP\nchr1:abc\t3\n")]
    #[case("Position\tIP\nchr1:100\tstrong\n")]
    #[case("chr1:100\n")]
    fn test_parse_events_rejects_bad_lines(#[case] text: &str) {
        assert!(parse_events(Cursor::new(text)).is_err());
    }

    #[rstest]
    fn test_empty_file_has_no_events() {
        assert_eq!(parse_events(Cursor::new("")).unwrap(), vec![]);
    }

    #[rstest]
    fn test_read_missing_file() {
        assert!(read_events(Path::new("/no/such/events.txt")).is_err());
    }
}
