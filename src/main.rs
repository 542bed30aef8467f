//! Interactive console front end for the exploration engine.
//!
//! Reads one command per line from stdin, feeds it to the session as an
//! event, then waits out any fetch the event started before rendering.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use neuroscan::adapter::EngineKind;
use neuroscan::anatomy::{Layer, Region};
use neuroscan::config::Config;
use neuroscan::engine::events::Event;
use neuroscan::engine::state::{DetailView, Phase};
use neuroscan::logging::{log, obj, v_str, Domain, Level};
use neuroscan::markup::{tokenize, Block, Segment};
use neuroscan::pathway::infer_pathway;
use neuroscan::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let kind = EngineKind::from_config(&cfg);
    let engine = kind.build(&cfg)?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("engine", v_str(&format!("{kind:?}"))),
            ("model", v_str(&cfg.model)),
        ]),
    );

    let mut session = Session::new(neuroscan::catalog::Catalog::builtin(), Arc::from(engine));
    session.apply(Event::CredentialCheck(cfg.has_credential()));

    println!("NEUROSCAN 3D — consola de exploración");
    println!("comandos: region <r> | test <id> | case <id|none> | search <q> | layer <l> | struct <n> | hover <n|-> | close | reset | quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (cmd, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => continue,
            "quit" | "exit" => break,
            "region" => match Region::parse(arg) {
                Some(region) => session.apply(Event::SelectRegion(region)),
                None => println!("región desconocida: {arg}"),
            },
            "test" => session.apply(Event::ChooseTest(arg.to_string())),
            "case" => {
                let id = (arg != "none").then(|| arg.to_string());
                session.apply(Event::SelectCase(id));
            }
            "search" => session.apply(Event::Search(arg.to_string())),
            "layer" => match Layer::parse(arg) {
                Some(layer) => session.apply(Event::SetLayer(layer)),
                None => println!("capa desconocida: {arg}"),
            },
            "struct" => session.apply(Event::ClickStructure(arg.to_string())),
            "hover" => {
                let name = (arg != "-").then(|| arg.to_string());
                session.apply(Event::HoverStructure(name));
            }
            "close" => session.apply(Event::CloseDetail),
            "reset" => session.apply(Event::Reset),
            other => {
                println!("comando desconocido: {other}");
                continue;
            }
        }

        session.settle_all().await;
        render(&session);
    }

    Ok(())
}

fn render(session: &Session) {
    let state = session.state();
    match state.phase() {
        Phase::Idle => println!("[inactivo] capa: {}", state.active_layer.display()),
        Phase::RegionPicking => {
            let region = state.selected_region.expect("picking implies region");
            println!(
                "[paso {} — {}] pruebas disponibles:",
                region.exam_step(),
                region.exam_label()
            );
            for test in state.available_tests(session.catalog()) {
                println!("  {:24} {} ({})", test.id, test.name, test.category.display());
            }
        }
        Phase::Evaluating => println!("[consultando…]"),
        Phase::Presenting => {}
        Phase::Failed => {}
    }

    if let Some(feedback) = &state.feedback {
        println!("{}", feedback.message);
    }

    if let Some(analysis) = &state.analysis {
        // References sit mid-line, so the segments are joined into one
        // buffer instead of printed per block.
        let mut out = String::new();
        for segment in tokenize(&analysis.content) {
            match segment {
                Segment::Blocks(blocks) => {
                    let lines: Vec<String> = blocks
                        .into_iter()
                        .map(|block| match block {
                            Block::Heading1(t) => format!("══ {t} ══"),
                            Block::Heading2(t) => format!("─ {t} ─"),
                            Block::Heading3(t) => format!("· {t}"),
                            Block::Step(t) => format!("  » {t}"),
                            Block::Text(t) => t,
                        })
                        .collect();
                    out.push_str(&lines.join("\n"));
                }
                Segment::StructureRef(name) => {
                    out.push('⟨');
                    out.push_str(&name);
                    out.push('⟩');
                }
            }
        }
        println!("{out}");
        if let Some(pathway) = infer_pathway(Some(analysis)) {
            println!("vía trazada: {} ({:?})", pathway.as_str(), pathway.direction());
        }
        if !analysis.sources.is_empty() {
            println!("fuentes:");
            for source in &analysis.sources {
                println!("  {} — {}", source.title, source.uri);
            }
        }
    }

    if let DetailView::Open(detail) = &state.detail {
        println!("┌ {}", detail.name);
        println!("│ embriología: {}", detail.embryology);
        println!("│ localización: {}", detail.localization);
        println!("└ función: {}", detail.function);
    }
}
