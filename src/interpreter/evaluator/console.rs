use std::{collections::VecDeque, io};

/// The text channel a running program talks to.
///
/// `print` receives program output; `read_line` blocks until a line of input
/// is available and returns it without its line terminator. Programs run on
/// their own thread, so a console must be `Send`.
pub trait Console: Send {
    fn print(&mut self, text: &str);
    fn read_line(&mut self) -> io::Result<String>;
}

type InputCallback = Box<dyn FnMut() -> String + Send>;

/// A console that records everything into a transcript.
///
/// Input comes from a queue of scripted lines, then from an optional
/// callback; once both are exhausted every read yields an empty line. Each
/// line read is echoed into the transcript followed by a newline, the way an
/// interactive terminal shows typed input.
#[derive(Default)]
pub struct BufferedConsole {
    output:   String,
    input:    VecDeque<String>,
    callback: Option<InputCallback>,
}

impl BufferedConsole {
    /// A console that answers reads with `lines`, in order.
    #[must_use]
    pub fn with_input<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self { input: lines.into_iter().map(Into::into).collect(),
               ..Self::default() }
    }

    /// A console that asks `callback` for every line.
    #[must_use]
    pub fn with_callback(callback: impl FnMut() -> String + Send + 'static) -> Self {
        Self { callback: Some(Box::new(callback)),
               ..Self::default() }
    }

    /// Everything printed or echoed so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }
}

impl Console for BufferedConsole {
    fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn read_line(&mut self) -> io::Result<String> {
        let line = match self.input.pop_front() {
            Some(line) => line,
            None => self.callback.as_mut().map(|read| read()).unwrap_or_default(),
        };
        self.output.push_str(&line);
        self.output.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_is_echoed() {
        let mut console = BufferedConsole::with_input(["42", "abc"]);
        console.print("n? ");
        assert_eq!(console.read_line().unwrap(), "42");
        assert_eq!(console.read_line().unwrap(), "abc");
        assert_eq!(console.read_line().unwrap(), "");
        assert_eq!(console.output(), "n? 42\nabc\n\n");
    }

    #[test]
    fn callback_supplies_lines() {
        let mut count = 0;
        let mut console = BufferedConsole::with_callback(move || {
                              count += 1;
                              count.to_string()
                          });
        assert_eq!(console.read_line().unwrap(), "1");
        assert_eq!(console.read_line().unwrap(), "2");
        assert_eq!(console.into_output(), "1\n2\n");
    }
}
