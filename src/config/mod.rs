pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::config::toml_config::TomlConfig;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_extensions, validate_url, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "nfce-reader")]
    #[command(about = "Read NFe/NFC-e XML files, check access keys and look up products")]
    pub struct CliConfig {
        /// XML files to load
        #[arg(required = true)]
        pub files: Vec<String>,

        /// 1-based product ordinal to look up in the active document
        #[arg(short, long, allow_hyphen_values = true)]
        pub ordinal: Option<String>,

        /// Make this loaded file the active document instead of the last one loaded
        #[arg(short, long)]
        pub select: Option<String>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Directory the file paths are relative to
        #[arg(long, default_value = ".")]
        pub base_path: String,

        /// Fiscal namespace URI, tried in the order given (repeatable)
        #[arg(long = "namespace")]
        pub namespaces: Vec<String>,

        /// Reject documents whose Id attribute does not start with NFe
        #[arg(long)]
        pub strict_id_prefix: bool,

        /// Require a <prod> element inside every <det>
        #[arg(long)]
        pub require_nested_prod: bool,

        /// Base URL for the NCM lookup link
        #[arg(long)]
        pub ncm_base_url: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        pub json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 以設定檔補上命令列沒有指定的值
        pub fn apply_file_defaults(&mut self, file: &TomlConfig) {
            if self.namespaces.is_empty() {
                self.namespaces = file.namespaces().to_vec();
            }
            self.strict_id_prefix |= file.strict_id_prefix();
            self.require_nested_prod |= file.require_nested_prod();
            if self.ncm_base_url.is_none() {
                self.ncm_base_url = file.ncm_lookup_base().map(String::from);
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn namespaces(&self) -> &[String] {
            &self.namespaces
        }

        fn strict_id_prefix(&self) -> bool {
            self.strict_id_prefix
        }

        fn require_nested_prod(&self) -> bool {
            self.require_nested_prod
        }

        fn ncm_lookup_base(&self) -> Option<&str> {
            self.ncm_base_url.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_file_extensions("files", &self.files, &["xml"])?;
            if let Some(base) = &self.ncm_base_url {
                validate_url("ncm_base_url", base)?;
            }
            Ok(())
        }
    }

}
