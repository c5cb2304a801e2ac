use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

use timetable_share_lib::{
    list_templates, Document, ShareConfig, ShareService, DEFAULT_BASE_URL, DEFAULT_TEMPLATE_ID,
};

// 引数を構造体として定義します
#[derive(Parser)]
#[command(name = "timetable_tools")]
#[command(version = "0.1.0")]
#[command(about = "時間割の共有URLを作成・復元・診断します", long_about = None)]
struct Cli {
    /// 共有URLの土台
    #[arg(long, global = true, env = "TIMETABLE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// 共有リンクが読めないときに使うテンプレート
    #[arg(
        long,
        global = true,
        env = "TIMETABLE_FALLBACK_TEMPLATE",
        default_value = DEFAULT_TEMPLATE_ID
    )]
    fallback_template: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ドキュメントJSONから共有URLを作ります
    Encode {
        /// ドキュメントファイル (JSON)
        file: PathBuf,
    },

    /// 共有URL (またはクエリ文字列) からドキュメントJSONを復元します
    Decode {
        url: String,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// 共有URLの長さを診断します
    Inspect { url: String },

    /// テンプレートの初期ドキュメントを出力します
    Template {
        id: String,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// テンプレートの一覧を表示します
    Templates,
}

fn write_document(document: &Document, out: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("ドキュメントをJSONにできませんでした")?;
    match out {
        Some(path) => fs::write(&path, json)
            .with_context(|| format!("ファイル '{}' に書き込めませんでした", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn encode(service: &ShareService, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("ファイル '{}' を読めませんでした", file.display()))?;
    let document: Document =
        serde_json::from_str(&text).context("ファイルが時間割ドキュメントの形式に沿っていません")?;

    let url = service.share_url(&document);
    println!("{url}");

    let budget = service.inspect_url(url.as_str());
    if let Some(advisory) = budget.advisory {
        eprintln!("{} ({} 文字)", advisory, budget.length);
    }
    Ok(())
}

fn decode(service: &ShareService, input: &str, out: Option<PathBuf>) -> Result<()> {
    let outcome = service.decode_input(input);
    if let Some(advisory) = &outcome.advisory {
        eprintln!("{advisory}");
    }
    write_document(&outcome.document, out)
}

fn inspect(service: &ShareService, url: &str) {
    let budget = service.inspect_url(url);
    println!(
        "length: {} ({}%), band: {}",
        budget.length,
        budget.percent(),
        budget.band.as_str()
    );
    if let Some(advisory) = budget.advisory {
        println!("{advisory}");
    }
}

fn main() -> Result<()> {
    // ログは stderr へ。既定は warn 以上
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let service = ShareService::new(ShareConfig {
        base_url: args.base_url,
        fallback_template: args.fallback_template,
    });

    // パターンマッチで分岐処理
    match args.command {
        Commands::Encode { file } => encode(&service, &file)?,
        Commands::Decode { url, out } => decode(&service, &url, out)?,
        Commands::Inspect { url } => inspect(&service, &url),
        Commands::Template { id, out } => {
            let document = timetable_share_lib::get_template_by_id(&id).default_document();
            if document.meta.template_id != id {
                tracing::warn!(
                    requested = %id,
                    used = %document.meta.template_id,
                    "unknown template id"
                );
            }
            write_document(&document, out)?;
        }
        Commands::Templates => {
            for template in list_templates() {
                println!(
                    "{:<12} {} ({}コマ x {}日)",
                    template.id,
                    template.name,
                    template.period_count,
                    template.days.len()
                );
            }
        }
    }
    Ok(())
}
