// Confirmation Prompt
// Yes/no questions before destructive operations

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin and return the answer.
///
/// `default` is returned when the user just presses ENTER (or stdin is
/// closed). Anything other than y/Y/n/N asks again.
pub fn confirm(prompt: &str, default: bool) -> io::Result<bool> {
    confirm_with(&mut io::stdin().lock(), &mut io::stdout(), prompt, default)
}

fn confirm_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
    default: bool,
) -> io::Result<bool> {
    let prompt = if default {
        format!("{prompt} [y]|n: ")
    } else {
        format!("{prompt} [n]|y: ")
    };

    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(default);
        }
        match line.trim() {
            "" => return Ok(default),
            "y" | "Y" => return Ok(true),
            "n" | "N" => return Ok(false),
            _ => writeln!(output, "please enter y or n.")?,
        }
    }
}
