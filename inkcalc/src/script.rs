//! # Session scripts
//!
//! A recorded drawing session, one event per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! # pen strokes, optional pressure in [0, 1]
//! down 10 10 0.5
//! move 40 12
//! up
//! # plain mouse path, and touch (only drawn if touch is accepted)
//! mouse-down 5 5
//! mouse-move 9 9
//! mouse-up
//! touch-down 1 1
//! submit
//! wait 2000
//! say please calculate this
//! color #ff0000
//! color 3
//! ```

use inkcalc_core::color::ColorParseError;
use inkcalc_core::input::{InputSource, PointerSample};
use inkcalc_core::overlay::Millis;
use inkcalc_core::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum ColorChoice {
    Literal(Color),
    /// Index into the configured swatches.
    Swatch(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Down(PointerSample),
    Move(PointerSample),
    Up,
    /// A finalized speech transcript.
    Say(String),
    ToggleVoice,
    Submit,
    Reset,
    Eraser,
    Color(ColorChoice),
    Resize { width: u32, height: u32 },
    Load(std::path::PathBuf),
    /// Save to the given path, or the default output.
    Save(Option<std::path::PathBuf>),
    /// Advance the logical clock.
    Wait(Millis),
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScriptErrorKind {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` takes {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("invalid color: {0}")]
    Color(#[from] ColorParseError),
}

/// Parse a whole script. Fails on the first malformed line.
pub fn parse(text: &str) -> Result<Vec<Event>, ScriptError> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = parse_line(line).map_err(|kind| ScriptError {
            line: idx + 1,
            kind,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, ScriptErrorKind> {
    word.parse()
        .map_err(|_| ScriptErrorKind::Number(word.to_owned()))
}

/// `x y [pressure]`. Pressure is only meaningful for the pen.
fn position(
    command: &'static str,
    args: &[&str],
    allow_pressure: bool,
) -> Result<((f32, f32), Option<f32>), ScriptErrorKind> {
    let expected = if allow_pressure {
        "`x y [pressure]`"
    } else {
        "`x y`"
    };
    match *args {
        [x, y] => Ok(((number(x)?, number(y)?), None)),
        [x, y, p] if allow_pressure => Ok(((number(x)?, number(y)?), Some(number(p)?))),
        _ => Err(ScriptErrorKind::Arguments { command, expected }),
    }
}

fn no_args(command: &'static str, args: &[&str]) -> Result<(), ScriptErrorKind> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ScriptErrorKind::Arguments {
            command,
            expected: "no arguments",
        })
    }
}

fn parse_line(line: &str) -> Result<Event, ScriptErrorKind> {
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let pen = |command, down: bool| -> Result<Event, ScriptErrorKind> {
        let (pos, pressure) = position(command, &args, true)?;
        let source = InputSource::Pointer {
            kind: inkcalc_core::input::PointerKind::Pen,
            pressure,
        };
        let sample = PointerSample::new(pos, source);
        Ok(if down {
            Event::Down(sample)
        } else {
            Event::Move(sample)
        })
    };
    let other = |command, down: bool, source: InputSource| -> Result<Event, ScriptErrorKind> {
        let (pos, _) = position(command, &args, false)?;
        let sample = PointerSample::new(pos, source);
        Ok(if down {
            Event::Down(sample)
        } else {
            Event::Move(sample)
        })
    };

    match command.to_ascii_lowercase().as_str() {
        "down" => pen("down", true),
        "move" => pen("move", false),
        "mouse-down" => other("mouse-down", true, InputSource::Coarse),
        "mouse-move" => other("mouse-move", false, InputSource::Coarse),
        "touch-down" => other("touch-down", true, InputSource::touch()),
        "touch-move" => other("touch-move", false, InputSource::touch()),
        "up" | "mouse-up" | "touch-up" | "leave" => {
            no_args("up", &args)?;
            Ok(Event::Up)
        }
        "say" => Ok(Event::Say(rest.to_owned())),
        "voice" => no_args("voice", &args).map(|()| Event::ToggleVoice),
        "submit" => no_args("submit", &args).map(|()| Event::Submit),
        "reset" => no_args("reset", &args).map(|()| Event::Reset),
        "eraser" => no_args("eraser", &args).map(|()| Event::Eraser),
        "color" => {
            if rest.is_empty() {
                return Err(ScriptErrorKind::Arguments {
                    command: "color",
                    expected: "a color or swatch index",
                });
            }
            if let Ok(index) = rest.parse::<usize>() {
                Ok(Event::Color(ColorChoice::Swatch(index)))
            } else {
                Ok(Event::Color(ColorChoice::Literal(rest.parse()?)))
            }
        }
        "resize" => match *args {
            [w, h] => Ok(Event::Resize {
                width: number(w)?,
                height: number(h)?,
            }),
            _ => Err(ScriptErrorKind::Arguments {
                command: "resize",
                expected: "`width height`",
            }),
        },
        "load" => {
            if rest.is_empty() {
                Err(ScriptErrorKind::Arguments {
                    command: "load",
                    expected: "a path",
                })
            } else {
                Ok(Event::Load(rest.into()))
            }
        }
        "save" => Ok(Event::Save((!rest.is_empty()).then(|| rest.into()))),
        "wait" => match *args {
            [ms] => Ok(Event::Wait(number(ms)?)),
            _ => Err(ScriptErrorKind::Arguments {
                command: "wait",
                expected: "milliseconds",
            }),
        },
        _ => Err(ScriptErrorKind::UnknownCommand(command.to_owned())),
    }
}

#[cfg(test)]
mod test {
    use super::{parse, ColorChoice, Event, ScriptError, ScriptErrorKind};
    use inkcalc_core::input::{InputSource, PointerKind, PointerSample};
    use inkcalc_core::Color;

    #[test]
    fn full_session() {
        let events = parse(
            "
            # a stroke
            down 10 20 0.5
            move 30 20
            up

            mouse-down 1 2
            touch-move 3 4
            say please Calculate this
            submit
            wait 1500
            color #ff0000
            color 2
            color rgb(1, 2, 3)
            eraser
            voice
            resize 640 480
            load some picture.png
            save
            save out.png
            reset
            ",
        )
        .unwrap();
        assert_eq!(
            events,
            [
                Event::Down(PointerSample::new((10.0, 20.0), InputSource::pen(0.5))),
                Event::Move(PointerSample::new(
                    (30.0, 20.0),
                    InputSource::Pointer {
                        kind: PointerKind::Pen,
                        pressure: None
                    }
                )),
                Event::Up,
                Event::Down(PointerSample::new((1.0, 2.0), InputSource::Coarse)),
                Event::Move(PointerSample::new((3.0, 4.0), InputSource::touch())),
                Event::Say("please Calculate this".to_owned()),
                Event::Submit,
                Event::Wait(1500),
                Event::Color(ColorChoice::Literal(Color::rgb(255, 0, 0))),
                Event::Color(ColorChoice::Swatch(2)),
                Event::Color(ColorChoice::Literal(Color::rgb(1, 2, 3))),
                Event::Eraser,
                Event::ToggleVoice,
                Event::Resize {
                    width: 640,
                    height: 480
                },
                Event::Load("some picture.png".into()),
                Event::Save(None),
                Event::Save(Some("out.png".into())),
                Event::Reset,
            ]
        );
    }
    #[test]
    fn errors_carry_line() {
        assert_eq!(
            parse("up\n\nscribble 1 2"),
            Err(ScriptError {
                line: 3,
                kind: ScriptErrorKind::UnknownCommand("scribble".to_owned())
            })
        );
        assert!(matches!(
            parse("down 1"),
            Err(ScriptError {
                line: 1,
                kind: ScriptErrorKind::Arguments { command: "down", .. }
            })
        ));
        // Mouse path carries no pressure.
        assert!(matches!(
            parse("mouse-down 1 2 0.5"),
            Err(ScriptError {
                kind: ScriptErrorKind::Arguments { .. },
                ..
            })
        ));
        assert!(matches!(
            parse("wait soon"),
            Err(ScriptError {
                kind: ScriptErrorKind::Number(_),
                ..
            })
        ));
        assert!(matches!(
            parse("color mauve-ish"),
            Err(ScriptError {
                kind: ScriptErrorKind::Color(_),
                ..
            })
        ));
        assert!(matches!(
            parse("submit now"),
            Err(ScriptError {
                kind: ScriptErrorKind::Arguments { .. },
                ..
            })
        ));
    }
    #[test]
    fn empty_script() {
        assert_eq!(parse("# nothing\n   \n"), Ok(Vec::new()));
    }
}
