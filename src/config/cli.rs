use crate::domain::ports::DocumentSource;
use crate::utils::error::Result;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Reads a document from a file, or from stdin when no path (or `-`) is given.
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: Option<PathBuf>,
}

impl LocalSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.filter(|p| p.as_os_str() != "-");
        Self { path }
    }

    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }
}

impl DocumentSource for LocalSource {
    async fn read_document(&self) -> Result<String> {
        match &self.path {
            Some(path) => Ok(tokio::fs::read_to_string(path).await?),
            None => {
                let mut content = String::new();
                tokio::io::stdin().read_to_string(&mut content).await?;
                Ok(content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{}").unwrap();

        let source = LocalSource::new(Some(file.path().to_path_buf()));
        assert_eq!(source.read_document().await.unwrap(), "{}");
    }

    #[test]
    fn test_dash_means_stdin() {
        assert_eq!(LocalSource::new(Some(PathBuf::from("-"))).describe(), "<stdin>");
        assert_eq!(LocalSource::new(None).describe(), "<stdin>");
    }
}
