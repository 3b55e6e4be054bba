// 內建 Helvetica 字型只支援 WinAnsi 編碼，其他字元以替代字元輸出

const AVERAGE_GLYPH_WIDTH_EM: f32 = 0.52;

/// Encodes text for a WinAnsi-encoded Type 1 font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().filter_map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\n' | '\r' => return None,
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        c if c.is_control() => return None,
        // emoji 等無法編碼的字元
        _ => b'?',
    };
    Some(byte)
}

pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVERAGE_GLYPH_WIDTH_EM
}

/// Greedy word wrap; explicit newlines are kept as line breaks.
pub fn wrap(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (font_size * AVERAGE_GLYPH_WIDTH_EM)) as usize).max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word.to_string();
            // 超長單字 (例如網址) 強制斷開
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split_at = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(index, _)| index)
                    .unwrap_or(word.len());
                lines.push(word[..split_at].to_string());
                word = word[split_at..].to_string();
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café • 5€"), b"Caf\xe9 \x95 5\x80".to_vec());
        assert_eq!(encode_win_ansi("Tokyo 東京"), b"Tokyo ??".to_vec());
        assert_eq!(encode_win_ansi("a\nb"), b"ab".to_vec());
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("one two three four five six seven", 10.0, 60.0);
        // 60 / (10 * 0.52) = 11 characters per line
        assert_eq!(lines, vec!["one two", "three four", "five six", "seven"]);
    }

    #[test]
    fn test_wrap_keeps_blank_lines_and_splits_long_words() {
        let lines = wrap("a\n\nabcdefghijklmnop", 10.0, 53.0);
        assert_eq!(lines, vec!["a", "", "abcdefghij", "klmnop"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert_eq!(wrap("", 10.0, 100.0), vec![String::new()]);
    }
}
