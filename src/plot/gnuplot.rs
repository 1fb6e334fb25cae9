//! Drive an external gnuplot process over its stdin.
//!
//! The protocol is plain newline-terminated text:
//!
//! ```text
//! set term wx
//! set xlabel 'X'
//! set ylabel 'Y'
//! set title '<X,Y> and Linear fit'
//! plot '-' title '<x,y>','-' title 'Line' with line ls 12
//! 10.000000 8.040000        <- n raw points
//! ...
//! e                         <- end of first inline series
//! 10.000000 8.013727        <- n fitted points (c0 + c1 x)
//! ...
//! e                         <- end of second inline series
//! exit
//! ```
//!
//! Rendering is split from transport: `write_commands` targets any `Write`,
//! so the same bytes can go to a pipe, a script file, or a test buffer.
//! gnuplot's output is never read.

use std::io::{self, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::domain::{GnuplotConfig, LinearFit, SampleSet};

/// Line that terminates an inline (`'-'`) data block.
pub const SENTINEL: &str = "e";

const TITLE: &str = "<X,Y> and Linear fit";

/// Write the terminal/label/plot commands and both inline series.
///
/// Does not flush and does not send `exit`; see `write_exit`.
pub fn write_commands<W: Write>(
    out: &mut W,
    samples: &SampleSet,
    fit: &LinearFit,
    terminal: &str,
) -> io::Result<()> {
    writeln!(out, "set term {terminal}")?;
    writeln!(out, "set xlabel 'X'")?;
    writeln!(out, "set ylabel 'Y'")?;
    writeln!(out, "set title '{TITLE}'")?;
    writeln!(out, "plot '-' title '<x,y>','-' title 'Line' with line ls 12")?;

    for (x, y) in samples.points() {
        writeln!(out, "{x:.6} {y:.6}")?;
    }
    writeln!(out, "{SENTINEL}")?;

    for &x in &samples.x {
        writeln!(out, "{x:.6} {:.6}", fit.predict(x))?;
    }
    writeln!(out, "{SENTINEL}")?;

    Ok(())
}

/// Ask gnuplot to quit once it has drawn.
pub fn write_exit<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "exit")
}

/// Render the full session (commands + `exit`) as a string, e.g. for `--script`.
pub fn render_script(samples: &SampleSet, fit: &LinearFit, terminal: &str) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_commands(&mut buf, samples, fit, terminal).and_then(|()| write_exit(&mut buf));
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write-only channel to a spawned gnuplot process.
///
/// Closing (explicitly via `close`, or on drop) shuts stdin and waits for the
/// process to exit.
pub struct GnuplotPipe {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    status: Option<ExitStatus>,
}

impl GnuplotPipe {
    /// Spawn `config.program` (with `-persist` if requested) with a piped stdin.
    pub fn open(config: &GnuplotConfig) -> io::Result<Self> {
        let mut cmd = Command::new(&config.program);
        if config.persist {
            cmd.arg("-persist");
        }
        let mut child = cmd.stdin(Stdio::piped()).spawn()?;
        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::other("gnuplot stdin was not captured"));
        };

        tracing::debug!(program = %config.program, pid = child.id(), "gnuplot started");
        Ok(Self {
            child,
            stdin: Some(BufWriter::new(stdin)),
            status: None,
        })
    }

    /// Close stdin and block until gnuplot exits.
    pub fn close(mut self) -> io::Result<ExitStatus> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        if let Some(mut stdin) = self.stdin.take() {
            if let Err(err) = stdin.flush() {
                tracing::warn!("gnuplot pipe flush failed on close: {err}");
            }
        }
        let status = self.child.wait()?;
        self.status = Some(status);
        Ok(status)
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<ChildStdin>> {
        self.stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gnuplot pipe is closed"))
    }
}

impl Write for GnuplotPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for GnuplotPipe {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!("failed to reap gnuplot: {err}");
        }
    }
}

/// What happened to the plotting step. Never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    /// The process could not be launched; nothing was written.
    Skipped { reason: String },
    /// The process ran; `write_error` records a failed write or flush.
    Finished {
        exited_ok: bool,
        write_error: Option<String>,
    },
}

/// Open a pipe to gnuplot, stream the plot, and close it.
pub fn plot_with_gnuplot(config: &GnuplotConfig, samples: &SampleSet, fit: &LinearFit) -> PlotOutcome {
    let mut pipe = match GnuplotPipe::open(config) {
        Ok(pipe) => pipe,
        Err(err) => {
            tracing::warn!("unable to launch '{}': {err}; skipping plot", config.program);
            return PlotOutcome::Skipped {
                reason: err.to_string(),
            };
        }
    };

    let written = write_commands(&mut pipe, samples, fit, &config.terminal)
        .and_then(|()| pipe.flush())
        .and_then(|()| write_exit(&mut pipe));
    let write_error = match written {
        Ok(()) => None,
        Err(err) => {
            tracing::warn!("writing to gnuplot failed: {err}");
            Some(err.to_string())
        }
    };

    let exited_ok = match pipe.close() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::warn!("gnuplot exited with {status}");
            false
        }
        Err(err) => {
            tracing::warn!("failed to wait for gnuplot: {err}");
            false
        }
    };

    PlotOutcome::Finished {
        exited_ok,
        write_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SAMPLE;
    use crate::math::fit_linear;

    fn session() -> (Vec<String>, LinearFit) {
        let fit = fit_linear(&SAMPLE.x, &SAMPLE.y).unwrap();
        let mut buf = Vec::new();
        write_commands(&mut buf, &SAMPLE, &fit, "wx").unwrap();
        write_exit(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        (text.lines().map(str::to_string).collect(), fit)
    }

    #[test]
    fn header_commands_come_first() {
        let (lines, _) = session();
        assert_eq!(
            &lines[..5],
            &[
                "set term wx",
                "set xlabel 'X'",
                "set ylabel 'Y'",
                "set title '<X,Y> and Linear fit'",
                "plot '-' title '<x,y>','-' title 'Line' with line ls 12",
            ]
        );
        assert_eq!(lines.last().map(String::as_str), Some("exit"));
    }

    #[test]
    fn data_blocks_are_n_lines_each_with_sentinels() {
        let (lines, fit) = session();
        let n = SAMPLE.x.len();
        let body = &lines[5..lines.len() - 1];
        assert_eq!(body.len(), 2 * n + 2);

        assert_eq!(lines.iter().filter(|l| l.as_str() == SENTINEL).count(), 2);
        assert_eq!(body[n], SENTINEL);
        assert_eq!(body[2 * n + 1], SENTINEL);

        for (i, (x, y)) in SAMPLE.points().enumerate() {
            assert_eq!(body[i], format!("{x:.6} {y:.6}"));
            assert_eq!(body[n + 1 + i], format!("{x:.6} {:.6}", fit.c0 + fit.c1 * x));
        }
        assert_eq!(body[0], "10.000000 8.040000");
        assert_eq!(body[n + 1], "10.000000 8.013727");
    }

    #[test]
    fn render_script_matches_streamed_bytes() {
        let (lines, fit) = session();
        let script = render_script(&SAMPLE, &fit, "wx");
        assert_eq!(script, format!("{}\n", lines.join("\n")));
        assert!(render_script(&SAMPLE, &fit, "pngcairo").starts_with("set term pngcairo\n"));
    }

    #[test]
    fn missing_program_skips_plot() {
        let fit = fit_linear(&SAMPLE.x, &SAMPLE.y).unwrap();
        let config = GnuplotConfig {
            program: "fitplot-no-such-gnuplot".to_string(),
            persist: true,
            terminal: "wx".to_string(),
        };
        assert!(matches!(
            plot_with_gnuplot(&config, &SAMPLE, &fit),
            PlotOutcome::Skipped { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn early_exiting_program_is_not_fatal() {
        let fit = fit_linear(&SAMPLE.x, &SAMPLE.y).unwrap();
        let config = GnuplotConfig {
            program: "true".to_string(),
            persist: false,
            terminal: "dumb".to_string(),
        };
        match plot_with_gnuplot(&config, &SAMPLE, &fit) {
            PlotOutcome::Finished { exited_ok, .. } => assert!(exited_ok),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn dropping_the_pipe_reaps_the_process() {
        let config = GnuplotConfig {
            program: "true".to_string(),
            persist: false,
            terminal: "dumb".to_string(),
        };
        let pipe = GnuplotPipe::open(&config).unwrap();
        drop(pipe);
    }
}
