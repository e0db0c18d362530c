use clap::{Parser, Subcommand};
use plex_library::{ClientConfig, FilterValue, Library, MediaItem, SearchRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plex_library", version, about = "Browse and search a media server library")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 列出全部分区
    Sections,

    /// 正在观看
    OnDeck,

    /// 最近添加
    Recent,

    /// 列出分区某个过滤类别的可选值
    Choices {
        /// 分区标题
        section: String,

        /// 过滤类别，如 genre、year
        category: String,
    },

    /// 在分区内搜索
    Search {
        /// 分区标题
        section: String,

        /// 标题关键字
        title: Option<String>,

        /// 排序，如 titleSort:desc
        #[arg(long)]
        sort: Option<String>,

        /// 结果上限
        #[arg(long)]
        max: Option<usize>,

        /// 结果类型，如 episode
        #[arg(long = "type")]
        lib_type: Option<String>,

        /// 过滤条件 category=value，多个值用逗号分隔
        #[arg(short, long = "filter", value_name = "CATEGORY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, FilterValue)>,
    },

    /// 刷新全部分区
    Refresh,

    /// 优化数据库
    Optimize,

    /// 清理无用的 bundle
    CleanBundles,

    /// 清空全部分区的回收站
    EmptyTrash,
}

/// 解析 `category=value`；无逗号时为单值，否则为列表
fn parse_filter(arg: &str) -> Result<(String, FilterValue), String> {
    let (category, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got `{}`", arg))?;
    if category.is_empty() {
        return Err(format!("missing filter category in `{}`", arg));
    }

    let value = if values.contains(',') {
        FilterValue::from(values.split(',').collect::<Vec<_>>())
    } else {
        FilterValue::from(values)
    };
    Ok((category.to_string(), value))
}

fn search_request(
    title: Option<String>,
    sort: Option<String>,
    max: Option<usize>,
    lib_type: Option<String>,
    filters: Vec<(String, FilterValue)>,
) -> SearchRequest {
    let mut request = SearchRequest::new();
    if let Some(title) = title {
        request = request.title(title);
    }
    if let Some(sort) = sort {
        request = request.sort(sort);
    }
    if let Some(max) = max {
        request = request.max_results(max);
    }
    if let Some(lib_type) = lib_type {
        request = request.lib_type(lib_type);
    }
    for (category, value) in filters {
        request = request.filter(category, value);
    }
    request
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let library = Library::connect(&config)?;
    tracing::info!("Connected to {}", config.base_url);

    match cli.command.unwrap_or(Command::Sections) {
        Command::Sections => {
            for section in library.sections().await? {
                println!("{:>4}  {:<8} {}", section.key(), section.kind().type_tag(), section.title());
            }
        }
        Command::OnDeck => print_titles(&library.on_deck().await?),
        Command::Recent => print_titles(&library.recently_added().await?),
        Command::Choices { section, category } => {
            let section = library.section(&section).await?;
            for choice in section.list_choices(&category, None, &[]).await? {
                println!("{:>8}  {}", choice.key, choice.title);
            }
        }
        Command::Search {
            section,
            title,
            sort,
            max,
            lib_type,
            filters,
        } => {
            let section = library.section(&section).await?;
            let request = search_request(title, sort, max, lib_type, filters);

            let results = section.search(&request).await?;
            print_titles(&results.items);
            for diagnostic in &results.diagnostics {
                eprintln!("note: {:?}", diagnostic);
            }
        }
        Command::Refresh => library.refresh().await?,
        Command::Optimize => library.optimize().await?,
        Command::CleanBundles => library.clean_bundles().await?,
        Command::EmptyTrash => library.empty_trash().await?,
    }

    Ok(())
}

fn print_titles(items: &[MediaItem]) {
    for item in items {
        match item.year {
            Some(year) => println!("[{}] {} ({})", item.kind.as_str(), item.title, year),
            None => println!("[{}] {}", item.kind.as_str(), item.title),
        }
    }
}
