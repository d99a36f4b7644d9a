#![forbid(unsafe_code)]

//! `cardform` binary entry point.

use std::io::{self, Write};

use cardform_core::form::FormConfig;
use cardform_core::sink::{FanoutSink, RecordingSink, TracingSink};
use cardform_tui::app::CardFormApp;
use cardform_tui::cli::Opts;
use cardform_tui::logging::{self, LogConfig};
use cardform_tui::runtime::{Program, ProgramConfig};
use cardform_tui::terminal_session::{SessionOptions, TerminalSession};

fn main() {
    let opts = Opts::parse();

    if let Err(e) = logging::init(LogConfig {
        file: opts.log_file.as_deref(),
        filter: &opts.log_level,
        json: opts.log_json,
    }) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let recorder = RecordingSink::new();
    let sink = FanoutSink::new().with(TracingSink).with(recorder.clone());
    let config = FormConfig {
        revalidate: opts.revalidate,
    };

    if let Err(e) = run(CardFormApp::with_config(sink, config)) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }

    if opts.echo
        && let Err(e) = echo(&recorder)
    {
        eprintln!("Failed to print submissions: {e}");
        std::process::exit(1);
    }
}

fn run(app: CardFormApp<FanoutSink>) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        bracketed_paste: true,
    })?;
    let mut stdout = io::stdout();
    let mut program = Program::new(app, 0, 0);
    program.run(&session, &mut stdout, ProgramConfig::default())
}

/// Print every submitted field-set as one JSON line.
fn echo(recorder: &RecordingSink) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for fields in recorder.drain() {
        serde_json::to_writer(&mut out, &fields).map_err(io::Error::other)?;
        writeln!(out)?;
    }
    out.flush()
}
