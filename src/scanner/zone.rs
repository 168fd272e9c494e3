//! Domain extraction from zone files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use domain::base::iana::Rtype;
use domain::zonefile::inplace::{Entry, Zonefile};
use log::debug;

use crate::error_handling::ScanError;

/// How deep `$INCLUDE` directives may nest before the zone is rejected.
const MAX_INCLUDE_DEPTH: usize = 8;

/// Collects the owner names of a zone worth scanning.
///
/// NS records are skipped, as are names without a dot (the zone anchor).
/// Owner names are returned without the trailing dot, in file order and
/// without deduplication. `$INCLUDE` directives are followed in place;
/// relative include paths resolve against the working directory.
///
/// # Errors
///
/// Returns `ScanError::Io` if the reader or an included file fails and
/// `ScanError::Zone` on a syntax error or runaway include nesting.
pub fn domains_from_zone<R: Read>(reader: R) -> Result<Vec<String>, ScanError> {
    collect_zone(reader, None)
}

/// Like [`domains_from_zone`], reading the zone from `path`.
///
/// Relative `$INCLUDE` paths resolve against the directory of `path`.
///
/// # Errors
///
/// See [`domains_from_zone`].
pub fn domains_from_zone_file(path: &Path) -> Result<Vec<String>, ScanError> {
    let file = File::open(path)?;
    collect_zone(file, path.parent())
}

fn collect_zone<R: Read>(mut reader: R, base_dir: Option<&Path>) -> Result<Vec<String>, ScanError> {
    let zone = Zonefile::load(&mut reader)?;
    let mut domains = Vec::new();
    collect_domains(zone, base_dir, 0, &mut domains)?;
    Ok(domains)
}

fn collect_domains(
    zone: Zonefile,
    base_dir: Option<&Path>,
    depth: usize,
    domains: &mut Vec<String>,
) -> Result<(), ScanError> {
    for entry in zone {
        match entry.map_err(|e| ScanError::Zone(e.to_string()))? {
            Entry::Record(record) => {
                if record.rtype() == Rtype::NS {
                    continue;
                }

                let owner = record.owner().to_string();
                let domain = owner.trim_matches('.');
                if !domain.contains('.') {
                    continue;
                }

                domains.push(domain.to_string());
            }
            Entry::Include { path, origin } => {
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(ScanError::Zone(format!(
                        "$INCLUDE nested deeper than {MAX_INCLUDE_DEPTH} levels"
                    )));
                }

                let path = include_path(base_dir, &path.to_string());
                debug!("Following $INCLUDE {}", path.display());
                let mut file = File::open(&path)?;
                let mut included = Zonefile::load(&mut file)?;
                if let Some(origin) = origin {
                    included.set_origin(origin);
                }
                collect_domains(included, path.parent(), depth + 1, domains)?;
            }
        }
    }

    Ok(())
}

fn include_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
