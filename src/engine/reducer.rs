//! Pure transition function of the exploration state machine.
//!
//! Every mutation of [`SessionState`] happens here, synchronously, with the
//! requested side effects returned as commands. The driver owns execution;
//! completions re-enter as settle events.

use crate::anatomy::{classify, Layer};
use crate::catalog::Catalog;
use crate::engine::events::{Command, Event};
use crate::engine::state::{DetailView, Feedback, FeedbackKind, SessionState};
use crate::logging::Level;

pub const MISSING_CREDENTIAL_MSG: &str =
    "Sin credencial para el Atlas Digital. Configura GEMINI_API_KEY.";
pub const REQUEST_FAILED_MSG: &str = "Error de conexión con el Atlas Digital.";
pub const CORRECT_DEDUCTION_MSG: &str = "✅ ¡Deducción correcta!";

fn wrong_deduction_msg(test_name: &str) -> String {
    format!(
        "❌ {} no localiza esta lesión. Considera otra vía anatómica.",
        test_name
    )
}

/// Applies one event to the session aggregate and returns the side effects
/// the driver must run. Never blocks and never performs I/O.
pub fn reduce(state: &mut SessionState, event: Event, catalog: &Catalog) -> Vec<Command> {
    let mut commands = Vec::new();

    match event {
        Event::CredentialCheck(ok) => {
            state.credential_ok = ok;
        }

        Event::SelectRegion(region) => {
            // A fresh pick discards whatever the previous attempt showed.
            state.selected_region = Some(region);
            state.analysis = None;
            state.feedback = None;
            state.detail = DetailView::Closed;
            state.request_failed = false;
        }

        Event::CloseRegionPicker => {
            state.selected_region = None;
        }

        Event::ChooseTest(test_id) => {
            let Some(test) = catalog.test_by_id(&test_id) else {
                commands.push(Command::Log {
                    level: Level::Warn,
                    msg: format!("unknown test id {test_id}"),
                });
                return commands;
            };
            if !guard_credential(state, &mut commands, "analysis") {
                return commands;
            }
            // Deduction verdict is decided before the fetch resolves, so the
            // learner sees it during the loading interval.
            if let Some(case) = state.active_case {
                state.feedback = Some(if case.correct_test_id == test.id {
                    Feedback {
                        kind: FeedbackKind::Correct,
                        message: CORRECT_DEDUCTION_MSG.to_string(),
                    }
                } else {
                    Feedback {
                        kind: FeedbackKind::Corrective,
                        message: wrong_deduction_msg(test.name),
                    }
                });
            } else {
                state.feedback = None;
            }
            state.selected_region = None;
            state.detail = DetailView::Closed;
            state.request_failed = false;
            state.loading = true;
            state.analysis_seq += 1;
            commands.push(Command::FetchAnalysis {
                seq: state.analysis_seq,
                request: crate::adapter::AnalysisRequest::Protocol(*test),
            });
            commands.push(Command::Log {
                level: Level::Info,
                msg: format!("analysis dispatched for test {}", test.id),
            });
        }

        Event::Search(query) => {
            let query = query.trim().to_string();
            if query.is_empty() {
                return commands;
            }
            if !guard_credential(state, &mut commands, "search") {
                return commands;
            }
            state.selected_region = None;
            state.feedback = None;
            state.detail = DetailView::Closed;
            state.request_failed = false;
            state.loading = true;
            state.analysis_seq += 1;
            commands.push(Command::FetchAnalysis {
                seq: state.analysis_seq,
                request: crate::adapter::AnalysisRequest::Query(query.clone()),
            });
            commands.push(Command::Log {
                level: Level::Info,
                msg: format!("analysis dispatched for query \"{query}\""),
            });
        }

        Event::SelectCase(id) => {
            state.active_case = match id {
                Some(ref case_id) => match catalog.case_by_id(case_id) {
                    Some(case) => Some(*case),
                    None => {
                        commands.push(Command::Log {
                            level: Level::Warn,
                            msg: format!("unknown case id {case_id}"),
                        });
                        return commands;
                    }
                },
                None => None,
            };
            // Switching scenario invalidates everything shown for the old
            // one, including any in-flight analysis.
            state.analysis = None;
            state.feedback = None;
            state.selected_region = None;
            state.detail = DetailView::Closed;
            state.request_failed = false;
            if state.loading {
                state.loading = false;
                state.analysis_seq += 1;
            }
        }

        Event::SetLayer(layer) => {
            state.active_layer = layer;
        }

        Event::HoverStructure(name) => {
            state.highlighted_region = name.as_deref().map(classify);
        }

        Event::ClickStructure(name) => {
            if !state.credential_ok {
                commands.push(Command::Log {
                    level: Level::Warn,
                    msg: format!("detail blocked without credential: {name}"),
                });
                return commands;
            }
            state.detail_seq += 1;
            state.detail = DetailView::Fetching {
                seq: state.detail_seq,
                name: name.clone(),
            };
            commands.push(Command::FetchDetail {
                seq: state.detail_seq,
                name,
            });
        }

        Event::CloseDetail => {
            state.detail = DetailView::Closed;
        }

        Event::AnalysisSettled { seq, outcome } => {
            if seq != state.analysis_seq || !state.loading {
                commands.push(Command::Log {
                    level: Level::Debug,
                    msg: format!("stale analysis settle ignored (seq {seq})"),
                });
                return commands;
            }
            state.loading = false;
            match outcome {
                Ok(result) => {
                    state.analysis = Some(result);
                    state.request_failed = false;
                }
                Err(err) => {
                    state.request_failed = true;
                    state.feedback = Some(Feedback {
                        kind: FeedbackKind::Failure,
                        message: REQUEST_FAILED_MSG.to_string(),
                    });
                    commands.push(Command::Log {
                        level: Level::Error,
                        msg: format!("analysis failed: {err}"),
                    });
                }
            }
        }

        Event::DetailSettled { seq, outcome } => {
            let current = match &state.detail {
                DetailView::Fetching { seq: current, .. } => *current,
                _ => {
                    commands.push(Command::Log {
                        level: Level::Debug,
                        msg: format!("detail settle with no fetch open (seq {seq})"),
                    });
                    return commands;
                }
            };
            if seq != current {
                commands.push(Command::Log {
                    level: Level::Debug,
                    msg: format!("stale detail settle ignored (seq {seq})"),
                });
                return commands;
            }
            match outcome {
                Ok(detail) => {
                    state.detail = DetailView::Open(detail);
                }
                Err(err) => {
                    // Detail failures close the panel quietly; the main view
                    // stays whatever it was.
                    state.detail = DetailView::Closed;
                    commands.push(Command::Log {
                        level: Level::Error,
                        msg: format!("detail failed: {err}"),
                    });
                }
            }
        }

        Event::Reset => {
            let had_analysis_in_flight = state.loading;
            let had_detail_in_flight = matches!(state.detail, DetailView::Fetching { .. });
            state.selected_region = None;
            state.highlighted_region = None;
            state.active_layer = Layer::Skin;
            state.active_case = None;
            state.analysis = None;
            state.loading = false;
            state.feedback = None;
            state.detail = DetailView::Closed;
            state.request_failed = false;
            // Seqs only move when a fetch must be orphaned, so repeated
            // resets reach a fixed point.
            if had_analysis_in_flight {
                state.analysis_seq += 1;
            }
            if had_detail_in_flight {
                state.detail_seq += 1;
            }
        }
    }

    commands
}

/// Without a credential the attempt fails in place: failed flag, fixed
/// feedback message, zero fetch commands.
fn guard_credential(state: &mut SessionState, commands: &mut Vec<Command>, what: &str) -> bool {
    if state.credential_ok {
        return true;
    }
    state.selected_region = None;
    state.loading = false;
    state.request_failed = true;
    state.feedback = Some(Feedback {
        kind: FeedbackKind::Failure,
        message: MISSING_CREDENTIAL_MSG.to_string(),
    });
    commands.push(Command::Log {
        level: Level::Warn,
        msg: format!("{what} blocked without credential"),
    });
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AnalysisRequest, AnalysisResult, StructureDetail};
    use crate::anatomy::Region;
    use crate::engine::state::Phase;

    fn ready_state() -> SessionState {
        let mut state = SessionState::new();
        state.credential_ok = true;
        state
    }

    fn fetch_count(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, Command::FetchAnalysis { .. } | Command::FetchDetail { .. }))
            .count()
    }

    #[test]
    fn choose_test_dispatches_and_clears_picker() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::SelectRegion(Region::Head), &catalog);
        assert_eq!(state.phase(), Phase::RegionPicking);

        let commands = reduce(&mut state, Event::ChooseTest("cn7-facial".into()), &catalog);
        assert_eq!(state.phase(), Phase::Evaluating);
        assert!(state.selected_region.is_none());
        assert!(state.feedback.is_none());
        let fetch = commands
            .iter()
            .find_map(|c| match c {
                Command::FetchAnalysis { seq, request } => Some((*seq, request.clone())),
                _ => None,
            })
            .expect("fetch command");
        assert_eq!(fetch.0, state.analysis_seq);
        assert!(matches!(fetch.1, AnalysisRequest::Protocol(t) if t.id == "cn7-facial"));
    }

    #[test]
    fn deduction_verdict_lands_before_settle() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::SelectCase(Some("case-uncal".into())), &catalog);
        reduce(&mut state, Event::SelectRegion(Region::Head), &catalog);
        reduce(&mut state, Event::ChooseTest("cn3-4-6-ocular".into()), &catalog);
        assert!(state.loading);
        let feedback = state.feedback.as_ref().expect("verdict before settle");
        assert_eq!(feedback.kind, FeedbackKind::Correct);
        assert_eq!(feedback.message, CORRECT_DEDUCTION_MSG);
    }

    #[test]
    fn wrong_deduction_names_the_test_but_still_fetches() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::SelectCase(Some("case-bell".into())), &catalog);
        reduce(&mut state, Event::SelectRegion(Region::Head), &catalog);
        let commands = reduce(&mut state, Event::ChooseTest("cn1-olfactory".into()), &catalog);
        let feedback = state.feedback.as_ref().unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Corrective);
        assert!(feedback.message.contains("CN I: Olfatorio"));
        assert_eq!(fetch_count(&commands), 1);
    }

    #[test]
    fn missing_credential_fails_without_dispatch() {
        let catalog = Catalog::builtin();
        let mut state = SessionState::new();
        reduce(&mut state, Event::SelectRegion(Region::Arm), &catalog);
        let commands = reduce(&mut state, Event::ChooseTest("motor-bulk-tone".into()), &catalog);
        assert_eq!(fetch_count(&commands), 0);
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(
            state.feedback.as_ref().unwrap().message,
            MISSING_CREDENTIAL_MSG
        );
        assert!(!state.loading);
    }

    #[test]
    fn stale_analysis_settle_is_a_display_noop() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::Search("vía piramidal".into()), &catalog);
        let first = state.analysis_seq;
        reduce(&mut state, Event::Search("nervio mediano".into()), &catalog);
        assert!(state.analysis_seq > first);

        let stale = reduce(
            &mut state,
            Event::AnalysisSettled {
                seq: first,
                outcome: Ok(AnalysisResult { content: "viejo".into(), sources: vec![] }),
            },
            &catalog,
        );
        assert!(state.loading, "stale settle must not clear loading");
        assert!(state.analysis.is_none());
        assert_eq!(fetch_count(&stale), 0);

        let seq = state.analysis_seq;
        reduce(
            &mut state,
            Event::AnalysisSettled {
                seq,
                outcome: Ok(AnalysisResult { content: "nuevo".into(), sources: vec![] }),
            },
            &catalog,
        );
        assert!(!state.loading);
        assert_eq!(state.analysis.as_ref().unwrap().content, "nuevo");
    }

    #[test]
    fn analysis_failure_keeps_session_interactive() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::Search("ataxia".into()), &catalog);
        let seq = state.analysis_seq;
        reduce(
            &mut state,
            Event::AnalysisSettled {
                seq,
                outcome: Err("timeout".into()),
            },
            &catalog,
        );
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.feedback.as_ref().unwrap().message, REQUEST_FAILED_MSG);

        // A new attempt leaves the failed phase.
        reduce(&mut state, Event::SelectRegion(Region::Leg), &catalog);
        assert_eq!(state.phase(), Phase::RegionPicking);
        assert!(!state.request_failed);
    }

    #[test]
    fn case_change_supersedes_in_flight_analysis() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::Search("reflejo nauseoso".into()), &catalog);
        let old_seq = state.analysis_seq;
        reduce(&mut state, Event::SelectCase(Some("case-weber".into())), &catalog);
        assert!(!state.loading);
        assert!(state.analysis_seq > old_seq);

        reduce(
            &mut state,
            Event::AnalysisSettled {
                seq: old_seq,
                outcome: Ok(AnalysisResult { content: "viejo".into(), sources: vec![] }),
            },
            &catalog,
        );
        assert!(state.analysis.is_none());
    }

    #[test]
    fn detail_lifecycle_is_independent_of_analysis() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        state.analysis = Some(AnalysisResult { content: "algo".into(), sources: vec![] });

        let commands = reduce(&mut state, Event::ClickStructure("Puente".into()), &catalog);
        assert_eq!(fetch_count(&commands), 1);
        assert!(matches!(state.detail, DetailView::Fetching { .. }));
        assert!(!state.loading);

        let seq = state.detail_seq;
        reduce(
            &mut state,
            Event::DetailSettled {
                seq,
                outcome: Err("500".into()),
            },
            &catalog,
        );
        assert_eq!(state.detail, DetailView::Closed);
        assert!(!state.request_failed, "detail failure never fails the session");
        assert!(state.analysis.is_some());
    }

    #[test]
    fn detail_success_opens_the_record() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::ClickStructure("Núcleo Rojo".into()), &catalog);
        let detail = StructureDetail {
            name: "Núcleo Rojo".into(),
            embryology: "Mesencéfalo".into(),
            localization: "Tegmento mesencefálico".into(),
            function: "Vía rubroespinal".into(),
        };
        let seq = state.detail_seq;
        reduce(
            &mut state,
            Event::DetailSettled {
                seq,
                outcome: Ok(detail.clone()),
            },
            &catalog,
        );
        assert_eq!(state.detail, DetailView::Open(detail));
    }

    #[test]
    fn click_without_credential_only_logs() {
        let catalog = Catalog::builtin();
        let mut state = SessionState::new();
        let commands = reduce(&mut state, Event::ClickStructure("Puente".into()), &catalog);
        assert_eq!(fetch_count(&commands), 0);
        assert_eq!(state.detail, DetailView::Closed);
        assert!(!state.request_failed);
        assert!(state.feedback.is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::SelectCase(Some("case-bulbar".into())), &catalog);
        reduce(&mut state, Event::SetLayer(Layer::Tract), &catalog);
        reduce(&mut state, Event::Search("disfagia".into()), &catalog);

        reduce(&mut state, Event::Reset, &catalog);
        let once = state.clone();
        reduce(&mut state, Event::Reset, &catalog);
        assert_eq!(state, once);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.active_layer, Layer::Skin);
        assert!(state.credential_ok, "reset keeps the credential check");
    }

    #[test]
    fn hover_tracks_classifier() {
        let catalog = Catalog::builtin();
        let mut state = ready_state();
        reduce(&mut state, Event::HoverStructure(Some("Nervio Femoral".into())), &catalog);
        assert_eq!(state.highlighted_region, Some(Region::Leg));
        reduce(&mut state, Event::HoverStructure(None), &catalog);
        assert!(state.highlighted_region.is_none());
    }
}
