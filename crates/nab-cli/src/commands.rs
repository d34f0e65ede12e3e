use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use nab_peer::{
    Anonymous, InMemoryGraphStore, MemorySession, PageWrite, Peer, PeerConfig, SessionProvider,
    ThingData, ThingHandle, ThingKind, UserSession,
};
use nab_store::GraphStore;
use nab_types::Soul;
use serde_json::json;

use crate::cli::*;

/// The store, loaded from its snapshot, and a peer over it.
struct Workspace {
    store: Arc<InMemoryGraphStore>,
    peer: Peer,
}

impl Workspace {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => PeerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PeerConfig::default(),
        };
        let store = Arc::new(load_store(&cli.store, config.channel_capacity)?);
        let session: Arc<dyn SessionProvider> = match (&cli.alias, &cli.pub_key) {
            (Some(alias), Some(pub_key)) => {
                Arc::new(MemorySession::logged_in(UserSession::new(alias, pub_key)))
            }
            _ => Arc::new(Anonymous),
        };
        let peer = Peer::new(store.clone(), session, &config)?;
        Ok(Self { store, peer })
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.store.to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

fn load_store(path: &Path, capacity: usize) -> anyhow::Result<InMemoryGraphStore> {
    if !path.exists() {
        return Ok(InMemoryGraphStore::with_capacity(capacity));
    }
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(InMemoryGraphStore::from_json(&json, capacity)?)
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ws = Workspace::open(&cli)?;
    let wrote = match &cli.command {
        Command::Submit(args) => cmd_submit(&ws, &cli, args).await?,
        Command::Comment(args) => cmd_comment(&ws, &cli, args).await?,
        Command::Chat(args) => cmd_chat(&ws, &cli, args).await?,
        Command::Page(args) => cmd_page(&ws, &cli, args).await?,
        Command::Vote(args) => cmd_vote(&ws, &cli, args).await?,
        Command::Show(args) => cmd_show(&ws, args).await?,
        Command::List(args) => cmd_list(&ws, &cli, args).await?,
    };
    if wrote {
        ws.save(&cli.store)?;
    }
    Ok(())
}

/// Wait for indexing and report the thing.
async fn finish_thing(cli: &Cli, mut thing: ThingHandle) -> anyhow::Result<bool> {
    let report = thing.wait_indexed().await?;
    let buckets: Vec<String> = report
        .map(|r| r.buckets.iter().map(|b| b.to_string()).collect())
        .unwrap_or_default();
    match cli.format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "id": thing.id.to_hex(),
                "soul": thing.soul(),
                "data": thing.data_soul,
                "buckets": buckets,
            })
        ),
        OutputFormat::Text => {
            println!("{} Wrote thing {}", "✓".green().bold(), thing.id.to_hex().yellow());
            println!("  Soul: {}", thing.soul().to_string().cyan());
            println!("  Data: {}", thing.data_soul.to_string().cyan());
            for bucket in &buckets {
                println!("  {} {}", "indexed:".green(), bucket);
            }
        }
    }
    Ok(true)
}

async fn cmd_submit(ws: &Workspace, cli: &Cli, args: &SubmitArgs) -> anyhow::Result<bool> {
    let mut data = ThingData::new(ThingKind::Submission)
        .with_topic(&args.topic)
        .with_title(&args.title);
    data.url = args.url.clone();
    data.body = args.body.clone();
    let thing = ws.peer.submit(data).await?;
    finish_thing(cli, thing).await
}

async fn cmd_comment(ws: &Workspace, cli: &Cli, args: &CommentArgs) -> anyhow::Result<bool> {
    // Without a topic the comment is indexed under its root's topic, and no
    // other writer can supply a missing root while this process runs.
    if args.topic.is_none() && ws.peer.thing_data(&args.op).await?.is_none() {
        bail!(
            "thread root {} is not in {}; pass --topic to comment without it",
            args.op,
            cli.store.display()
        );
    }
    let mut data = ThingData::new(ThingKind::Comment)
        .with_op(&args.op)
        .with_body(&args.body);
    data.reply_to_id = args.reply_to.clone();
    data.topic = args.topic.clone();
    let thing = ws.peer.comment(data).await?;
    finish_thing(cli, thing).await
}

async fn cmd_chat(ws: &Workspace, cli: &Cli, args: &ChatArgs) -> anyhow::Result<bool> {
    let data = ThingData::new(ThingKind::ChatMsg)
        .with_topic(&args.topic)
        .with_body(&args.body);
    let thing = ws.peer.chat(data).await?;
    finish_thing(cli, thing).await
}

async fn cmd_page(ws: &Workspace, cli: &Cli, args: &PageArgs) -> anyhow::Result<bool> {
    match ws.peer.write_page(&args.name, &args.body).await? {
        PageWrite::Created(thing) => finish_thing(cli, thing).await,
        PageWrite::Updated { thing, data } => {
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", json!({ "page": args.name, "soul": thing, "data": data }))
                }
                OutputFormat::Text => println!(
                    "{} Updated page {} ({})",
                    "✓".green().bold(),
                    args.name.bold(),
                    thing.to_string().cyan()
                ),
            }
            Ok(true)
        }
    }
}

async fn cmd_vote(ws: &Workspace, cli: &Cli, args: &VoteArgs) -> anyhow::Result<bool> {
    let vote = ws.peer.vote(&args.id, args.direction.into(), &args.nonce).await?;
    let count = ws.peer.vote_count(&args.id, vote.kind).await?;
    match cli.format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "bucket": vote.bucket, "nonce": vote.nonce, "count": count })
        ),
        OutputFormat::Text => println!(
            "{} Voted {} on {} ({} {})",
            "✓".green().bold(),
            vote.kind.to_string().yellow(),
            args.id.bold(),
            count,
            vote.kind.field()
        ),
    }
    Ok(true)
}

async fn cmd_show(ws: &Workspace, args: &ShowArgs) -> anyhow::Result<bool> {
    let soul = Soul::from(args.soul.as_str());
    match ws.store.get(&soul).await? {
        Some(node) => println!("{}", serde_json::to_string_pretty(&node)?),
        None => bail!("no node at {soul}"),
    }
    Ok(false)
}

async fn cmd_list(ws: &Workspace, cli: &Cli, args: &ListArgs) -> anyhow::Result<bool> {
    let members = match (args.bucket, &args.day) {
        (BucketKind::Topic, Some(day)) => {
            let (year, month, d) = parse_day(day)?;
            ws.peer.topic_day_members(&args.key, year, month, d).await?
        }
        (BucketKind::Topic, None) => ws.peer.topic_members(&args.key).await?,
        (_, Some(_)) => bail!("--day only applies to topic listings"),
        (BucketKind::Domain, None) => ws.peer.domain_members(&args.key).await?,
        (BucketKind::Url, None) => ws.peer.url_members(&args.key).await?,
        (BucketKind::Soul, None) => ws.peer.members(&Soul::from(args.key.as_str())).await?,
    };
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&members)?),
        OutputFormat::Text if members.is_empty() => println!("No members."),
        OutputFormat::Text => {
            for member in &members {
                println!("{}", member.to_string().cyan());
            }
        }
    }
    Ok(false)
}

fn parse_day(day: &str) -> anyhow::Result<(i32, u32, u32)> {
    let parts: Vec<&str> = day.split('/').collect();
    let [year, month, d] = parts.as_slice() else {
        bail!("expected YYYY/M/D, got {day}");
    };
    Ok((
        year.parse().context("year")?,
        month.parse().context("month")?,
        d.parse().context("day")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nab_types::Node;

    fn cli(store: &Path, args: &[&str]) -> Cli {
        let mut argv = vec!["nab", "--store", store.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn snapshot(store: &Path) -> InMemoryGraphStore {
        load_store(store, 16).unwrap()
    }

    #[test]
    fn parse_day_forms() {
        assert_eq!(parse_day("2019/3/5").unwrap(), (2019, 3, 5));
        assert!(parse_day("2019-03-05").is_err());
        assert!(parse_day("2019/x/5").is_err());
    }

    #[tokio::test]
    async fn submit_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let args = [
            "submit", "--topic", "News", "--title", "t", "--url", "https://www.example.com/a",
        ];
        run_command(cli(&path, &args)).await.unwrap();

        let store = snapshot(&path);
        let topic = store.get(&Soul::from("nab/t/news")).await.unwrap().unwrap();
        assert_eq!(topic.len(), 1);
        assert!(store.get(&Soul::from("nab/domains/example.com")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn comment_indexing_completes_before_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        run_command(cli(&path, &["submit", "--topic", "news", "--title", "root"]))
            .await
            .unwrap();
        let store = snapshot(&path);
        let topic: Node = store.get(&Soul::from("nab/t/news")).await.unwrap().unwrap();
        let root_soul = topic.keys().next().unwrap().clone();
        let root_id = root_soul.trim_start_matches("nab/things/").to_string();

        run_command(cli(&path, &["comment", "--op", &root_id, "--body", "hi"]))
            .await
            .unwrap();
        let store = snapshot(&path);
        assert!(store
            .get(&Soul::from("nab/t/comments:news"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn comment_on_unknown_root_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let err = run_command(cli(&path, &["comment", "--op", "nosuchroot", "--body", "hi"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nosuchroot"));
        assert!(!path.exists());

        let with_topic = ["comment", "--op", "nosuchroot", "--topic", "news", "--body", "hi"];
        run_command(cli(&path, &with_topic)).await.unwrap();
        let store = snapshot(&path);
        assert!(store
            .get(&Soul::from("nab/t/comments:news"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn page_needs_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        assert!(run_command(cli(&path, &["page", "about", "v1"])).await.is_err());
        assert!(!path.exists());

        let signed = ["--alias", "alice", "--pub-key", "pk", "page", "about", "v1"];
        run_command(cli(&path, &signed)).await.unwrap();
        let store = snapshot(&path);
        assert!(store.get(&Soul::from("~pk/pages")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn repeated_vote_is_one_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        for _ in 0..2 {
            run_command(cli(&path, &["vote", "abc123", "up", "n1"])).await.unwrap();
        }
        let store = snapshot(&path);
        let votes = store
            .get(&Soul::from("nab/things/abc123/votesup"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(votes.len(), 1);
    }

    #[tokio::test]
    async fn show_missing_soul_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        assert!(run_command(cli(&path, &["show", "nowhere"])).await.is_err());
    }

    #[tokio::test]
    async fn day_flag_is_topic_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        assert!(run_command(cli(&path, &["list", "domain", "x", "--day", "2019/3/5"]))
            .await
            .is_err());
    }
}
