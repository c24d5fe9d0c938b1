//! Interactive window over an offline session.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use warboard_core::{Board, Command, Coord, CursorHint};
use warboard_rendering::{
    Color, DialogChoice, DialogView, FrameFeedback, FrameInput, Presentation, RenderingBackend,
    Scene, SceneOptions,
};
use warboard_session::{PushChannel, Session, Transport};
use warboard_system_interaction::{ClickClassifier, Modifiers};

const CHAT_LINES_SHOWN: usize = 8;

/// Per-frame glue between backend input and the session.
#[derive(Debug)]
pub(crate) struct PlayController<T, P> {
    session: Session<T, P>,
    classifier: ClickClassifier,
    options: SceneOptions,
    shown_generation: u64,
    scene_stale: bool,
}

impl<T, P> PlayController<T, P>
where
    T: Transport,
    P: PushChannel,
{
    /// Wraps `session`, classifying presses with the provided double-click window.
    pub(crate) fn new(
        session: Session<T, P>,
        double_click_window: Duration,
        options: SceneOptions,
    ) -> Self {
        Self {
            session,
            classifier: ClickClassifier::new(double_click_window),
            options,
            shown_generation: 0,
            scene_stale: true,
        }
    }

    /// Session driven by the controller.
    #[cfg(test)]
    pub(crate) const fn session(&self) -> &Session<T, P> {
        &self.session
    }

    /// Applies one frame of input, refreshes `scene` and describes what to show.
    pub(crate) fn frame(&mut self, now: Instant, input: FrameInput, scene: &mut Scene) -> FrameFeedback {
        if input.toggle_terrain {
            self.options.show_terrain = !self.options.show_terrain;
            self.session.set_scene_options(self.options);
            self.scene_stale = true;
        }

        match input.dialog_choice {
            Some(DialogChoice::Confirm(kind)) => {
                if let Err(err) = self.session.confirm_creation(kind) {
                    warn!(%err, "unit creation not submitted");
                }
            }
            Some(DialogChoice::Cancel) => self.session.cancel_creation(),
            None => {}
        }

        if input.end_turn {
            self.session.submit(Command::EndTurn);
        }
        if input.start_game {
            self.session.submit(Command::StartGame);
        }
        if input.end_game {
            self.session.submit(Command::EndGame);
        }
        if input.refresh {
            debug!("board refresh requested");
            self.session.request_board();
        }

        let hovered = input
            .pointer
            .and_then(|pointer| Coord::from_pixel(pointer.x, pointer.y));
        if let Some(at) = hovered.filter(|_| input.pressed) {
            if self.session.creation_dialog().is_some() {
                debug!("board press ignored while the creation dialog is open");
            } else {
                let action = self.classifier.press(at, now);
                let modifiers = Modifiers::new(input.ctrl_held, input.alt_held);
                self.session.pointer(action, at, modifiers);
            }
        }

        let _ = self.session.pump();
        if let Some(context) = self.session.context() {
            if self.scene_stale || context.generation != self.shown_generation {
                scene.clone_from(&context.scene);
                self.shown_generation = context.generation;
                self.scene_stale = false;
            }
        }

        FrameFeedback {
            cursor: hovered.map_or(CursorHint::Default, |at| self.session.hover(at)),
            panel_lines: self.panel_lines(),
            dialog: self.session.creation_dialog().map(|dialog| DialogView {
                title: format!("Build at {},{}", dialog.at().x, dialog.at().y),
                options: dialog.options().to_vec(),
            }),
        }
    }

    fn panel_lines(&self) -> Vec<String> {
        let mut lines = match self.session.board() {
            Some(board) => summary_lines(&board),
            None => vec!["Waiting for the board...".to_string()],
        };
        let chat = self.session.chat();
        if !chat.is_empty() {
            lines.push(String::new());
            lines.extend(
                chat.lines()
                    .skip(chat.len().saturating_sub(CHAT_LINES_SHOWN))
                    .map(str::to_string),
            );
        }
        lines
    }
}

fn summary_lines(board: &Board) -> Vec<String> {
    let summary = board.summary();
    let status = if summary.game_active {
        "in progress"
    } else {
        "not started"
    };
    vec![
        format!("Day {} ({status})", summary.days),
        format!("Turn: {}", summary.current_turn),
        format!(
            "RED   troops {} props {} funds {}",
            summary.red.troops, summary.red.properties, summary.red.funds
        ),
        format!(
            "BLUE  troops {} props {} funds {}",
            summary.blue.troops, summary.blue.properties, summary.blue.funds
        ),
    ]
}

/// Fetches the first board and runs `backend` until the window closes.
pub(crate) fn play<T, P, B>(
    mut session: Session<T, P>,
    backend: B,
    double_click_window: Duration,
    options: SceneOptions,
) -> Result<()>
where
    T: Transport + 'static,
    P: PushChannel + 'static,
    B: RenderingBackend,
{
    session.request_board();
    let _ = session.pump();
    let scene = session
        .context()
        .map(|context| context.scene.clone())
        .context("no board snapshot available to display")?;
    let title = match session.board() {
        Some(board) => format!("warboard - day {}", board.days),
        None => "warboard".to_string(),
    };

    let presentation = Presentation::new(title, Color::from_rgb_u8(24, 24, 32), scene);
    let mut controller = PlayController::new(session, double_click_window, options);
    backend.run(presentation, move |_dt, input, scene| {
        controller.frame(Instant::now(), input, scene)
    })
}
