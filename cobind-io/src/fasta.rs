//! FASTA-backed [SequenceProvider]s.
//!
//! [GenomeAssembly] keeps every chromosome in memory and is the cached mode;
//! [IndexedGenome] seeks into a `.fai`-indexed FASTA for each request.

use std::fs::File;
use std::path::Path;

use bio::io::fasta;
use fxhash::FxHashMap;
use log::info;

use cobind_core::errors::CobindError;
use cobind_core::models::Region;
use cobind_core::traits::SequenceProvider;

fn lookup_failure(region: &Region, reason: impl Into<String>) -> CobindError {
    CobindError::LookupFailure {
        source_name: "genome".to_string(),
        region: region.to_string(),
        reason: reason.into(),
    }
}

///
/// Translate a 1-based inclusive region into a 0-based half-open span,
/// clipping the end at the chromosome length.
///
fn clip_span(region: &Region, chrom_len: u64) -> Result<(u64, u64), CobindError> {
    let start = region.start.max(1) as u64 - 1;
    let stop = (region.end as u64).min(chrom_len);
    if start >= stop {
        return Err(lookup_failure(
            region,
            format!("region lies beyond chromosome end ({})", chrom_len),
        ));
    }
    Ok((start, stop))
}

pub struct GenomeAssembly {
    seq_map: FxHashMap<String, Vec<u8>>,
}

impl TryFrom<&Path> for GenomeAssembly {
    type Error = CobindError;

    ///
    /// Create a new [GenomeAssembly] from fasta file
    ///
    fn try_from(value: &Path) -> Result<GenomeAssembly, CobindError> {
        let file = File::open(value)?;
        let genome = fasta::Reader::new(file);

        let mut seq_map: FxHashMap<String, Vec<u8>> = FxHashMap::default();
        for record in genome.records() {
            let record = record.map_err(|e| {
                CobindError::Parse(format!("genome file {:?}: {}", value, e))
            })?;
            seq_map.insert(record.id().to_string(), record.seq().to_owned());
        }

        info!("Loaded {} sequences from {:?}", seq_map.len(), value);

        Ok(GenomeAssembly { seq_map })
    }
}

impl GenomeAssembly {
    pub fn contains_chr(&self, chr: &str) -> bool {
        self.seq_map.contains_key(chr)
    }
}

impl SequenceProvider for GenomeAssembly {
    fn fetch(&mut self, region: &Region) -> Result<String, CobindError> {
        let seq = self
            .seq_map
            .get(&region.chr)
            .ok_or_else(|| lookup_failure(region, "unknown chromosome"))?;
        let (start, stop) = clip_span(region, seq.len() as u64)?;
        Ok(String::from_utf8_lossy(&seq[start as usize..stop as usize]).to_ascii_uppercase())
    }
}

pub struct IndexedGenome {
    reader: fasta::IndexedReader<File>,
    lengths: FxHashMap<String, u64>,
}

impl TryFrom<&Path> for IndexedGenome {
    type Error = CobindError;

    ///
    /// Open an indexed FASTA. The `.fai` index must sit next to the file.
    ///
    fn try_from(value: &Path) -> Result<IndexedGenome, CobindError> {
        let reader = fasta::IndexedReader::from_file(&value).map_err(|e| {
            CobindError::Io(std::io::Error::other(format!(
                "can't open indexed genome {:?}: {}",
                value, e
            )))
        })?;

        let lengths = reader
            .index
            .sequences()
            .into_iter()
            .map(|s| (s.name, s.len))
            .collect();

        Ok(IndexedGenome { reader, lengths })
    }
}

impl SequenceProvider for IndexedGenome {
    fn fetch(&mut self, region: &Region) -> Result<String, CobindError> {
        let chrom_len = *self
            .lengths
            .get(&region.chr)
            .ok_or_else(|| lookup_failure(region, "unknown chromosome"))?;
        let (start, stop) = clip_span(region, chrom_len)?;

        let mut seq: Vec<u8> = Vec::new();
        self.reader
            .fetch(&region.chr, start, stop)
            .and_then(|_| self.reader.read(&mut seq))
            .map_err(|e| lookup_failure(region, e.to_string()))?;

        Ok(String::from_utf8_lossy(&seq).to_ascii_uppercase())
    }
}

///
/// Open the genome either fully cached in memory or as an indexed reader.
///
pub fn open_sequence_provider(
    path: &Path,
    use_cache: bool,
) -> Result<Box<dyn SequenceProvider>, CobindError> {
    if use_cache {
        Ok(Box::new(GenomeAssembly::try_from(path)?))
    } else {
        Ok(Box::new(IndexedGenome::try_from(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(chr: &str, start: u32, end: u32) -> Region {
        Region {
            chr: chr.to_string(),
            start,
            end,
        }
    }

    #[fixture]
    fn genome_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        // 20 bases per line for chr1, one short line for chr2
        std::fs::write(
            dir.path().join("genome.fa"),
            ">chr1\nacgtacgtacGGGGCCCCTT\nAAAAATTTTT\n>chr2\nNNACGT\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("genome.fa.fai"), "chr1\t30\t6\t20\t21\nchr2\t6\t44\t6\t7\n")
            .unwrap();
        dir
    }

    #[rstest]
    fn test_assembly_fetch_is_one_based_and_uppercased(genome_dir: tempfile::TempDir) {
        let mut genome = GenomeAssembly::try_from(genome_dir.path().join("genome.fa").as_path()).unwrap();
        assert!(genome.contains_chr("chr2"));
        assert_eq!(genome.fetch(&region("chr1", 1, 4)).unwrap(), "ACGT");
        assert_eq!(genome.fetch(&region("chr1", 11, 14)).unwrap(), "GGGG");
        // clipped at the chromosome end
        assert_eq!(genome.fetch(&region("chr2", 3, 50)).unwrap(), "ACGT");
    }

    #[rstest]
    fn test_assembly_unknown_chromosome(genome_dir: tempfile::TempDir) {
        let mut genome = GenomeAssembly::try_from(genome_dir.path().join("genome.fa").as_path()).unwrap();
        assert!(matches!(
            genome.fetch(&region("chrZ", 1, 4)),
            Err(CobindError::LookupFailure { .. })
        ));
        assert!(genome.fetch(&region("chr2", 40, 50)).is_err());
    }

    #[rstest]
    fn test_indexed_matches_assembly(genome_dir: tempfile::TempDir) {
        let path = genome_dir.path().join("genome.fa");
        let mut cached = open_sequence_provider(&path, true).unwrap();
        let mut indexed = open_sequence_provider(&path, false).unwrap();

        for r in [region("chr1", 1, 4), region("chr1", 18, 25), region("chr2", 1, 100)] {
            assert_eq!(cached.fetch(&r).unwrap(), indexed.fetch(&r).unwrap());
        }
    }
}
