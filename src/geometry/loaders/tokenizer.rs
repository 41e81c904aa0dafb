//! 内存分词器模块
//!
//! 在原始文件字节上按空白切分出 token，不做任何拷贝。
//! 分词器感知行边界，让上层可以读取一行内数量可变的字段
//! （例如位置语句可选的齐次坐标 w，或面语句不定数量的顶点引用），
//! 而不需要固定元数的文法。

/// 对一段内存缓冲区做按空白分词的扫描器
///
/// token 是指向输入缓冲区的 `&str` 视图。缓冲区结束是显式的布尔状态
/// （`has_more`），不是错误。
///
/// # 示例
///
/// ```rust
/// use polysoup::geometry::loaders::Tokenizer;
///
/// let mut tokenizer = Tokenizer::new(b"v 1.0 2.0\nvn 0 0 1\n");
/// assert_eq!(tokenizer.next_token(false), "v");
/// assert_eq!(tokenizer.next_token(false), "1.0");
/// ```
pub struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// 在给定的字节缓冲区上创建分词器
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// 缓冲区中是否还有未消费的字节
    #[inline]
    pub fn has_more(&self) -> bool {
        self.pos < self.data.len()
    }

    /// 读取下一个 token
    ///
    /// 跳过前导空白后，返回到下一个空白为止的子串。
    ///
    /// # 参数
    ///
    /// - `same_line_only`: 若为真，且在遇到非空白字符之前越过了换行符，
    ///   则返回空串（表示"本行没有更多字段"），不消费下一行的内容。
    ///
    /// 无效的 UTF-8 字节序列退化为空串（容忍的畸形输入，不报错）。
    pub fn next_token(&mut self, same_line_only: bool) -> &'a str {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            if same_line_only && self.data[self.pos] == b'\n' {
                return "";
            }
            self.pos += 1;
        }

        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        std::str::from_utf8(&self.data[start..self.pos]).unwrap_or("")
    }

    /// 无条件跳到下一行的开头
    pub fn to_next_line(&mut self) {
        while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
            self.pos += 1;
        }
        if self.pos < self.data.len() {
            self.pos += 1;
        }
    }
}
