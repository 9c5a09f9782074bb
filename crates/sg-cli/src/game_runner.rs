use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use sg_api::{
    create_session, drive_session, load_game_from_file, Boundary, GameSession, SessionOptions,
};
use sg_core::{GameError, PlayerId};
use tracing::debug;

use crate::{emit_error, map_cli_reply_format, RunArgs};

type ReplyQueues = BTreeMap<PlayerId, VecDeque<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunEvent {
    End,
    Input { player: PlayerId, prompt: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunTranscript {
    pub(crate) event: RunEvent,
    pub(crate) broadcasts: Vec<String>,
    pub(crate) answers: Vec<(PlayerId, String)>,
}

pub(crate) fn run_game(args: RunArgs) -> Result<i32, GameError> {
    let descriptor = Arc::new(load_game_from_file(&args.game)?);
    let mut replies = parse_replies(&args.replies)?;
    let players = (1..=args.players).collect::<Vec<PlayerId>>();
    let mut session = create_session(
        descriptor,
        &players,
        SessionOptions {
            condition_evaluator: None,
            step_limit: args.step_limit,
        },
    )?;
    session.start()?;

    match run_with_replies(&mut session, &mut replies) {
        Ok(transcript) => {
            emit_transcript(&transcript, &session);
            Ok(0)
        }
        Err((error, broadcasts)) => {
            let code = emit_error(error);
            emit_texts(&broadcasts);
            Ok(code)
        }
    }
}

pub(crate) fn parse_replies(raw: &[String]) -> Result<ReplyQueues, GameError> {
    let mut queues = ReplyQueues::new();
    for entry in raw {
        let (player, text) = entry
            .split_once(':')
            .ok_or_else(|| map_cli_reply_format(entry))?;
        let player = player
            .trim()
            .parse::<PlayerId>()
            .map_err(|_| map_cli_reply_format(entry))?;
        queues.entry(player).or_default().push_back(text.to_string());
    }
    Ok(queues)
}

/// Drives the session, answering input requests from the reply queues,
/// until it ends or a request has no queued answer.
pub(crate) fn run_with_replies(
    session: &mut GameSession,
    replies: &mut ReplyQueues,
) -> Result<RunTranscript, (GameError, Vec<String>)> {
    let mut broadcasts = Vec::new();
    let mut answers = Vec::new();

    loop {
        let progress = drive_session(session);
        broadcasts.extend(progress.broadcasts);
        match progress.boundary {
            Boundary::End => {
                return Ok(RunTranscript {
                    event: RunEvent::End,
                    broadcasts,
                    answers,
                })
            }
            Boundary::Failed(error) => return Err((error, broadcasts)),
            Boundary::Input { player, prompt } => {
                let Some(reply) = replies.get_mut(&player).and_then(VecDeque::pop_front) else {
                    return Ok(RunTranscript {
                        event: RunEvent::Input { player, prompt },
                        broadcasts,
                        answers,
                    });
                };
                debug!(player, reply = %reply, "answering input request");
                if let Err(error) = session.submit_input(player, &reply) {
                    return Err((error, broadcasts));
                }
                answers.push((player, reply));
            }
        }
    }
}

fn emit_transcript(transcript: &RunTranscript, session: &GameSession) {
    println!("RESULT:OK");
    match &transcript.event {
        RunEvent::End => println!("EVENT:END"),
        RunEvent::Input { .. } => println!("EVENT:INPUT"),
    }
    emit_texts(&transcript.broadcasts);
    for (player, reply) in &transcript.answers {
        println!(
            "ANSWER:{}|{}",
            player,
            serde_json::to_string(reply).expect("string json")
        );
    }
    if let RunEvent::Input { player, prompt } = &transcript.event {
        println!(
            "INPUT_REQUEST:{}|{}",
            player,
            serde_json::to_string(prompt).expect("string json")
        );
    }

    let store = session.store();
    for (name, value) in store.globals() {
        println!("VAR:{}={}", name, value);
    }
    for player in store.player_ids() {
        if let Ok(variables) = store.player_snapshot(player) {
            for (name, value) in variables {
                println!("PLAYER_VAR:{}.{}={}", player, name, value);
            }
        }
    }
}

fn emit_texts(texts: &[String]) {
    for text in texts {
        println!(
            "TEXT_JSON:{}",
            serde_json::to_string(text).expect("string json")
        );
    }
}
