use thiserror::Error;

/// 解析單一 XML 檔案時的錯誤，文件不會被加入 registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("No infNFe element found")]
    MissingRoot,

    #[error("Id attribute does not start with NFe: {0:?}")]
    InvalidIdPrefix(String),

    #[error("Id attribute is missing or yields an empty access key")]
    MissingKey,

    #[error("Elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// 依序號查詢商品時的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No product at ordinal {ordinal} (document has {available} items)")]
    NotFound { ordinal: i64, available: usize },

    #[error("Item {ordinal} has no prod element")]
    MissingContainer { ordinal: i64 },
}

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid product ordinal: {value:?}")]
    InvalidOrdinal { value: String },

    #[error("Invalid NCM code for lookup link: {value:?}")]
    InvalidNcm { value: String },

    #[error("Unknown document: {name}")]
    UnknownDocument { name: String },

    #[error("No document is selected")]
    NoActiveDocument,

    #[error("Read task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Document,
    Lookup,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReaderError {
    pub fn parse(file: impl Into<String>, source: ParseError) -> Self {
        ReaderError::Parse {
            file: file.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ReaderError::Parse { .. } => ErrorCategory::Document,
            ReaderError::Lookup(_) => ErrorCategory::Lookup,
            ReaderError::IoError(_) | ReaderError::TaskError { .. } => ErrorCategory::System,
            ReaderError::SerializationError(_) => ErrorCategory::System,
            ReaderError::ConfigValidationError { .. }
            | ReaderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ReaderError::InvalidOrdinal { .. }
            | ReaderError::InvalidNcm { .. }
            | ReaderError::UnknownDocument { .. }
            | ReaderError::NoActiveDocument => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，沿用原表單的葡萄牙文用語
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReaderError::Parse {
                file,
                source: ParseError::Malformed(_) | ParseError::TooDeep(_),
            } => format!("Erro ao ler o arquivo \"{}\".", file),
            ReaderError::Parse {
                file,
                source: ParseError::MissingRoot,
            } => format!("O arquivo \"{}\" não contém infNFe.", file),
            ReaderError::Parse {
                file,
                source: ParseError::InvalidIdPrefix(_) | ParseError::MissingKey,
            } => format!("O arquivo \"{}\" não possui uma chave de acesso válida.", file),
            ReaderError::Lookup(LookupError::NotFound { .. }) => {
                "Produto não encontrado para essa ordem.".to_string()
            }
            ReaderError::Lookup(LookupError::MissingContainer { .. }) => {
                "O item não contém dados de produto (prod).".to_string()
            }
            ReaderError::InvalidOrdinal { value } if value.trim().is_empty() => {
                "Ordem do produto não informada.".to_string()
            }
            ReaderError::InvalidOrdinal { value } => {
                format!("Ordem do produto inválida: \"{}\".", value)
            }
            ReaderError::InvalidNcm { value } => format!("NCM inválido: \"{}\".", value),
            ReaderError::UnknownDocument { name } => {
                format!("Arquivo \"{}\" não foi carregado.", name)
            }
            ReaderError::NoActiveDocument => "Nenhum arquivo XML selecionado.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReaderError::Parse {
                source: ParseError::Malformed(_),
                ..
            } => "Check that the file is a complete, well-formed XML document",
            ReaderError::Parse {
                source: ParseError::TooDeep(_),
                ..
            } => "The file nests elements far deeper than any NFe does; check its contents",
            ReaderError::Parse { .. } => {
                "Make sure the file is an NFe/NFC-e document with an infNFe element and Id attribute"
            }
            ReaderError::Lookup(LookupError::NotFound { .. }) => {
                "Use an ordinal between 1 and the number of items in the document"
            }
            ReaderError::Lookup(LookupError::MissingContainer { .. }) => {
                "Disable require_nested_prod to read fields directly from the det element"
            }
            ReaderError::InvalidOrdinal { .. } => "Provide a positive integer ordinal, e.g. 1, 2, 3",
            ReaderError::InvalidNcm { .. } => "The product has no 8-digit NCM code to look up",
            ReaderError::UnknownDocument { .. } => "Pass the file on the command line before selecting it",
            ReaderError::NoActiveDocument => "Load at least one XML file before looking up a product",
            ReaderError::ConfigValidationError { .. } | ReaderError::InvalidConfigValueError { .. } => {
                "Review the configuration file and CLI flags"
            }
            ReaderError::IoError(_) => "Check that the file exists and is readable",
            ReaderError::SerializationError(_) | ReaderError::TaskError { .. } => {
                "Retry the command with --verbose for details"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_are_low_severity() {
        let err = ReaderError::from(LookupError::NotFound {
            ordinal: 3,
            available: 1,
        });
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(
            err.user_friendly_message(),
            "Produto não encontrado para essa ordem."
        );
    }

    #[test]
    fn test_parse_error_messages_name_the_file() {
        let err = ReaderError::parse("nota.xml", ParseError::MissingRoot);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("nota.xml"));
        assert!(err.to_string().contains("No infNFe element found"));
    }

    #[test]
    fn test_no_active_document_is_not_a_file_name() {
        let err = ReaderError::NoActiveDocument;
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.user_friendly_message(), "Nenhum arquivo XML selecionado.");
    }

    #[test]
    fn test_serialization_errors_are_system_errors() {
        let err: ReaderError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, ReaderError::SerializationError(_)));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_deep_document_reads_as_unreadable_file() {
        let err = ReaderError::parse("deep.xml", ParseError::TooDeep(128));
        assert_eq!(err.user_friendly_message(), "Erro ao ler o arquivo \"deep.xml\".");
    }

    #[test]
    fn test_empty_ordinal_message() {
        let err = ReaderError::InvalidOrdinal {
            value: "  ".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Ordem do produto não informada.");
    }
}
