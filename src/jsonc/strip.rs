//! # 宽松方言预处理
//!
//! 去除块注释 `/* ... */`、行注释 `// ...` 以及 `]` / `}` 之前的尾随逗号。
//!
//! 与全局正则替换不同，这里是一个跟踪字符串字面量状态的最小词法扫描，
//! 字符串内部出现的 `//`、`/*`、`,]` 都原样保留。
//! 注释中的换行会被保留，使解析器报告的行号与源文件一致。
//!
//! ## 依赖关系
//! - 被 `jsonc/mod.rs` 使用
//! - 无外部依赖

/// UTF-8 字节序标记
const BOM: char = '\u{feff}';

/// 去除注释与尾随逗号，返回可按严格 JSON 解析的文本
///
/// 未闭合的块注释或字符串保持原样，由后续的严格解析报告错误。
pub fn strip(input: &str) -> String {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());

    // 所有分隔符都是 ASCII，因此下面的下标都落在字符边界上
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&input[copied..i]);
                i = line_end(bytes, i);
                copied = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match block_end(bytes, i) {
                Some(end) => {
                    out.push_str(&input[copied..i]);
                    let newlines = input[i..end].matches('\n').count();
                    if newlines == 0 {
                        out.push(' ');
                    } else {
                        out.extend(std::iter::repeat('\n').take(newlines));
                    }
                    i = end;
                    copied = i;
                }
                None => i = bytes.len(),
            },
            b',' if matches!(next_significant(bytes, i + 1), Some(b']') | Some(b'}')) => {
                out.push_str(&input[copied..i]);
                i += 1;
                copied = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&input[copied..]);
    out
}

/// 从开引号位置跳过整个字符串字面量，返回闭引号之后的下标
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// 行注释结束位置（指向换行符本身，换行保留）
fn line_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| start + offset)
}

/// 块注释结束位置（`*/` 之后），未闭合时返回 `None`
fn block_end(bytes: &[u8], start: usize) -> Option<usize> {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|offset| start + 2 + offset + 2)
}

/// 跳过空白与注释，返回下一个有意义的字节
fn next_significant(bytes: &[u8], mut i: usize) -> Option<u8> {
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = line_end(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = block_end(bytes, i)?,
            b => return Some(b),
        }
    }
    None
}
