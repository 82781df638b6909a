//! Location of the SPK kernel backing the ephemeris.
//!
//! A kernel is designated by a source string:
//!
//! * `"naif:DE440"`: a NAIF planetary kernel, looked up as `de440.bsp` in the user cache
//!   directory (`<cache>/spacerocks_cache/jpl_ephem/`). With the `jpl-download` feature a
//!   missing kernel is downloaded from the NAIF server.
//! * `"file:/path/to/kernel.bsp"`: a kernel already on disk.
use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tracing::debug;

use crate::spacerocks_errors::SpaceRocksError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    /// NAIF planetary kernel version, lower case (`"de440"`).
    Naif(String),
    File(Utf8PathBuf),
}

impl FromStr for EphemFileSource {
    type Err = SpaceRocksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, value)) = s.split_once(':') else {
            return Err(SpaceRocksError::InvalidJPLStringFormat(format!(
                "{s}, expected 'naif:<version>' or 'file:<path>'"
            )));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(SpaceRocksError::InvalidJPLStringFormat(format!(
                "{s}, nothing after '{kind}:'"
            )));
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "naif" => Ok(EphemFileSource::Naif(value.to_ascii_lowercase())),
            "file" => Ok(EphemFileSource::File(Utf8PathBuf::from(value))),
            other => Err(SpaceRocksError::InvalidJPLEphemFileSource(other.to_string())),
        }
    }
}

impl TryFrom<&str> for EphemFileSource {
    type Error = SpaceRocksError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Default for EphemFileSource {
    fn default() -> Self {
        EphemFileSource::Naif("de440".to_string())
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{}", version.to_ascii_uppercase()),
            EphemFileSource::File(path) => write!(f, "file:{path}"),
        }
    }
}

impl EphemFileSource {
    /// Path of the kernel on disk, downloading it first when the `jpl-download` feature is
    /// enabled and the kernel is missing from the cache.
    ///
    /// Return
    /// ------
    /// * The path of an existing kernel, or an error if it cannot be found or fetched.
    pub fn resolve(&self) -> Result<Utf8PathBuf, SpaceRocksError> {
        match self {
            EphemFileSource::File(path) => {
                if path.exists() {
                    Ok(path.clone())
                } else {
                    Err(SpaceRocksError::JPLFileNotFound(path.to_string()))
                }
            }
            EphemFileSource::Naif(version) => {
                let local_file = cache_directory()?.join(format!("{version}.bsp"));
                if local_file.exists() {
                    debug!(path = %local_file, "using cached kernel");
                    return Ok(local_file);
                }
                fetch_kernel(version, &local_file)?;
                Ok(local_file)
            }
        }
    }
}

fn cache_directory() -> Result<Utf8PathBuf, SpaceRocksError> {
    let base_dir = BaseDirs::new().ok_or_else(|| {
        SpaceRocksError::UnableToCreateBaseDir("no home directory for this user".to_string())
    })?;
    let cache_path = Utf8Path::from_path(base_dir.cache_dir())
        .ok_or_else(|| SpaceRocksError::Utf8PathError(format!("{:?}", base_dir.cache_dir())))?;
    Ok(cache_path.join("spacerocks_cache").join("jpl_ephem"))
}

#[cfg(feature = "jpl-download")]
fn fetch_kernel(version: &str, local_file: &Utf8Path) -> Result<(), SpaceRocksError> {
    if let Some(parent) = local_file.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| SpaceRocksError::UnableToCreateBaseDir(format!("{parent}: {err}")))?;
    }
    let url = format!("https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/{version}.bsp");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(download_big_file(&url, local_file))
}

#[cfg(not(feature = "jpl-download"))]
fn fetch_kernel(_version: &str, local_file: &Utf8Path) -> Result<(), SpaceRocksError> {
    Err(SpaceRocksError::JPLFileNotFound(format!(
        "{local_file} (enable the jpl-download feature to fetch it)"
    )))
}

/// Stream `url` into `path`, going through a temporary file so an interrupted download
/// never leaves a truncated kernel in the cache.
#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), SpaceRocksError> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;
    use tracing::info;

    let partial = path.with_extension("bsp.part");
    let mut file = File::create(&partial).await?;
    info!(url, "downloading SPK kernel");

    let mut stream = reqwest::get(url).await?.error_for_status()?.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    tokio::fs::rename(&partial, path).await?;

    info!(path = %path, "SPK kernel downloaded");
    Ok(())
}

#[cfg(test)]
mod download_jpl_file_test {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            "naif:DE440".parse::<EphemFileSource>().unwrap(),
            EphemFileSource::Naif("de440".to_string())
        );
        assert_eq!(
            EphemFileSource::try_from("file:/data/de440s.bsp").unwrap(),
            EphemFileSource::File(Utf8PathBuf::from("/data/de440s.bsp"))
        );
        assert_eq!(EphemFileSource::default().to_string(), "naif:DE440");
    }

    #[test]
    fn test_invalid_source() {
        assert!(matches!(
            "de440".parse::<EphemFileSource>(),
            Err(SpaceRocksError::InvalidJPLStringFormat(_))
        ));
        assert!(matches!(
            "naif:".parse::<EphemFileSource>(),
            Err(SpaceRocksError::InvalidJPLStringFormat(_))
        ));
        assert_eq!(
            "horizon:DE440".parse::<EphemFileSource>(),
            Err(SpaceRocksError::InvalidJPLEphemFileSource("horizon".to_string()))
        );
    }

    #[test]
    fn test_missing_file() {
        let source = EphemFileSource::File(Utf8PathBuf::from("/nonexistent/de440.bsp"));
        assert_eq!(
            source.resolve(),
            Err(SpaceRocksError::JPLFileNotFound(
                "/nonexistent/de440.bsp".to_string()
            ))
        );
    }

    #[test]
    #[cfg(not(feature = "jpl-download"))]
    fn test_no_download_without_feature() {
        let source = EphemFileSource::Naif("de000-missing".to_string());
        assert!(source.resolve().is_err());
    }
}
