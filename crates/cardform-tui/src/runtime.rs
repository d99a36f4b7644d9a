#![forbid(unsafe_code)]

//! Elm-style runtime: a [`Model`] receives messages, returns [`Cmd`]s, and
//! renders itself into a [`Frame`].
//!
//! [`Program`] owns the model and its frame. It can be driven directly with
//! [`Program::send`] (tests, scripted input) or by [`Program::run`] against
//! a live [`TerminalSession`].

use std::io::{self, Write};
use std::time::Duration;

use crate::event::Event;
use crate::frame::Frame;
use crate::terminal_session::TerminalSession;

/// Application state plus its update and view functions.
pub trait Model {
    /// Messages the model reacts to. Terminal events convert into it.
    type Message: From<Event>;

    /// Startup commands. Called once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply a message and return follow-up commands.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state.
    fn view(&self, frame: &mut Frame);
}

/// Side effects requested by [`Model::update`].
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the program.
    Quit,
    /// Run several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Feed a message back to the model.
    Msg(M),
}

impl<M> Cmd<M> {
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    #[must_use]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[must_use]
    pub fn msg(msg: M) -> Self {
        Self::Msg(msg)
    }

    /// Combine commands, flattening trivial cases.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !matches!(c, Cmd::None)).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[must_use]
    pub fn is_quit(&self) -> bool {
        matches!(self, Cmd::Quit)
    }
}

/// Runtime loop settings.
#[derive(Debug, Clone, Copy)]
pub struct ProgramConfig {
    /// How long each wait for input may block.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(250),
        }
    }
}

/// Owns a model and its frame.
#[derive(Debug)]
pub struct Program<M: Model> {
    model: M,
    frame: Frame,
    running: bool,
    dirty: bool,
}

impl<M: Model> Program<M> {
    /// Create a program and run the model's `init` commands.
    pub fn new(model: M, width: u16, height: u16) -> Self {
        let mut program = Self {
            model,
            frame: Frame::new(width, height),
            running: true,
            dirty: true,
        };
        let cmd = program.model.init();
        program.execute(cmd);
        program
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[must_use]
    pub fn into_model(self) -> M {
        self.model
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Deliver an event. Resize events also resize the frame.
    pub fn send(&mut self, event: Event) {
        if let Event::Resize { width, height } = event {
            self.frame.resize(width, height);
        }
        self.dispatch(M::Message::from(event));
    }

    /// Deliver a message to the model.
    pub fn dispatch(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute(cmd);
    }

    /// Re-render if anything changed since the last render.
    pub fn render(&mut self) -> &Frame {
        if self.dirty {
            self.frame.clear();
            self.model.view(&mut self.frame);
            self.dirty = false;
        }
        &self.frame
    }

    /// Drive the program from a live terminal until the model quits.
    ///
    /// # Errors
    ///
    /// Returns terminal read/write errors.
    pub fn run(
        &mut self,
        session: &TerminalSession,
        out: &mut impl Write,
        config: ProgramConfig,
    ) -> io::Result<()> {
        let (width, height) = session.size()?;
        self.send(Event::Resize { width, height });
        tracing::info!(width, height, "event loop started");

        while self.running {
            if self.dirty {
                self.render().present(out)?;
            }
            if session.poll_event(config.poll_timeout)?
                && let Some(event) = session.read_event()?
            {
                self.send(event);
            }
        }
        tracing::info!("event loop stopped");
        Ok(())
    }

    fn execute(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                self.running = false;
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.execute(cmd);
                }
            }
            Cmd::Msg(msg) => self.dispatch(msg),
        }
    }
}
