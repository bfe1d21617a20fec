use std::io::{BufRead, Write};

/// Answer to the "attach a capture?" question, before the image is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAnswer {
    Image(String),
    Skip,
    Cancel,
}

fn read_answer<R: BufRead>(input: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask whether to attach a capture image: y (then a path), n, or c.
/// End of input counts as cancel.
pub fn ask_capture<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    item_path: &str,
    document_path: &str,
) -> anyhow::Result<CaptureAnswer> {
    loop {
        write!(
            out,
            "Attach a capture for '{item_path}' / '{document_path}'? [y]es, [n]o, [c]ancel: "
        )?;
        out.flush()?;

        let Some(answer) = read_answer(input)? else {
            return Ok(CaptureAnswer::Cancel);
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => loop {
                write!(out, "Capture image path: ")?;
                out.flush()?;
                match read_answer(input)? {
                    None => return Ok(CaptureAnswer::Cancel),
                    Some(path) if path.is_empty() => {}
                    Some(path) => return Ok(CaptureAnswer::Image(path)),
                }
            },
            "n" | "no" => return Ok(CaptureAnswer::Skip),
            "c" | "cancel" => return Ok(CaptureAnswer::Cancel),
            _ => writeln!(out, "Please answer y, n, or c.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::{CaptureAnswer, ask_capture};

    fn ask(input: &str) -> (CaptureAnswer, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = ask_capture(&mut reader, &mut out, "A/B", "plan.pdf").expect("prompt should answer");
        (answer, String::from_utf8(out).expect("utf-8 prompt"))
    }

    #[test]
    fn yes_then_path_attaches() {
        let (answer, prompt) = ask("y\n\nshots/one.png\n");
        assert_eq!(answer, CaptureAnswer::Image("shots/one.png".into()));
        assert!(prompt.contains("'A/B' / 'plan.pdf'"));
    }

    #[test]
    fn no_skips_and_cancel_cancels() {
        assert_eq!(ask("n\n").0, CaptureAnswer::Skip);
        assert_eq!(ask("CANCEL\n").0, CaptureAnswer::Cancel);
    }

    #[test]
    fn end_of_input_cancels() {
        assert_eq!(ask("").0, CaptureAnswer::Cancel);
        assert_eq!(ask("y\n").0, CaptureAnswer::Cancel);
    }

    #[test]
    fn unknown_answer_asks_again() {
        let (answer, prompt) = ask("maybe\nno\n");
        assert_eq!(answer, CaptureAnswer::Skip);
        assert!(prompt.contains("Please answer y, n, or c."));
    }
}
