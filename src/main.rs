use clap::Parser;
use nfce_reader::utils::error::ErrorSeverity;
use nfce_reader::utils::{logger, validation::Validate};
use nfce_reader::{
    ncm_lookup_url, CliConfig, DocumentLoader, DocumentOptions, FileReport, KeyStatus,
    LocalStorage, ProductEntry, ReaderError, Session, TomlConfig,
};
use serde::Serialize;

#[derive(Serialize)]
struct FileSummary {
    file: String,
    key: Option<KeyStatus>,
    duplicate: bool,
    error: Option<String>,
}

/// `--json` 時 stdout 只輸出這一個物件
#[derive(Serialize)]
struct Report<'a> {
    files: &'a [FileSummary],
    product: Option<&'a ProductSummary>,
}

#[derive(Serialize)]
struct ProductSummary {
    document: String,
    ordinal: String,
    #[serde(flatten)]
    product: ProductEntry,
    ncm_lookup_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting nfce-reader");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入 TOML 配置
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = match TomlConfig::from_file(&path) {
            Ok(file) => file,
            Err(e) => exit_with(&e),
        };
        if let Err(e) = file.validate() {
            exit_with(&e);
        }
        config.apply_file_defaults(&file);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let options = DocumentOptions::from_provider(&config);
    let mut session = Session::new(options);
    let loader = DocumentLoader::new(LocalStorage::new(config.base_path.clone()));

    let reports = loader.load_all(&mut session, &config.files).await;
    let files: Vec<FileSummary> = reports.iter().map(summarize).collect();

    let product = match select_and_lookup(&mut session, &config) {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!("Lookup failed: {}", e);
            print_report(&files, None, config.json);
            exit_with(&e);
        }
    };
    print_report(&files, product.as_ref(), config.json);

    if session.registry().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn select_and_lookup(
    session: &mut Session,
    config: &CliConfig,
) -> Result<Option<ProductSummary>, ReaderError> {
    if let Some(name) = &config.select {
        session.select(name)?;
    }
    config
        .ordinal
        .as_deref()
        .map(|ordinal| lookup(session, config, ordinal))
        .transpose()
}

fn summarize(report: &FileReport) -> FileSummary {
    match &report.outcome {
        Ok(outcome) => FileSummary {
            file: report.name.clone(),
            key: Some(outcome.key_status().clone()),
            duplicate: matches!(outcome, nfce_reader::LoadOutcome::AlreadyLoaded(_)),
            error: None,
        },
        Err(e) => FileSummary {
            file: report.path.clone(),
            key: None,
            duplicate: false,
            error: Some(e.user_friendly_message()),
        },
    }
}

fn lookup(
    session: &Session,
    config: &CliConfig,
    ordinal: &str,
) -> Result<ProductSummary, ReaderError> {
    let product = session.find_product(ordinal)?;
    let document = session
        .active()
        .map(|doc| doc.name().to_string())
        .unwrap_or_default();

    let link = match config.ncm_base_url.as_deref() {
        Some(base) if !ProductEntry::is_absent(&product.ncm) => {
            match ncm_lookup_url(base, &product.ncm) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    tracing::warn!("No NCM lookup link: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    Ok(ProductSummary {
        document,
        ordinal: ordinal.trim().to_string(),
        product,
        ncm_lookup_url: link,
    })
}

fn print_report(files: &[FileSummary], product: Option<&ProductSummary>, json: bool) {
    if json {
        let report = Report { files, product };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => exit_with(&ReaderError::from(e)),
        }
        return;
    }

    for file in files {
        match (&file.key, &file.error) {
            (Some(status), _) => {
                let verdict = if status.valid { "Chave válida" } else { "Chave inválida" };
                let note = if file.duplicate { " (já carregado)" } else { "" };
                println!("📄 {}{}\n   Chave: {}\n   {}", file.file, note, status.key, verdict);
            }
            (None, Some(error)) => println!("❌ {}", error),
            (None, None) => {}
        }
    }

    if let Some(summary) = product {
        println!("\n🔎 {} — item {}", summary.document, summary.ordinal);
        println!("   Código:    {}", summary.product.code);
        println!("   Descrição: {}", summary.product.description);
        println!("   NCM:       {}", summary.product.ncm);
        println!("   CFOP:      {}", summary.product.cfop);
        if let Some(url) = &summary.ncm_lookup_url {
            println!("   Consulta NCM: {}", url);
        }
    }
}

fn exit_with(e: &ReaderError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,      // 查無商品
        ErrorSeverity::Medium => 2,   // 輸入錯誤
        ErrorSeverity::High => 1,     // 文件或配置錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };
    std::process::exit(exit_code);
}
