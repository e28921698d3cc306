// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提供方错误体并入错误信息前的最大字符数
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// 按字符截断，不会切断多字节字符
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// 截断提供方返回的错误体
pub fn truncate_error_body(body: &str) -> String {
    truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS)
}

/// 把错误及其 `source()` 链拼成一行
///
/// 已经出现在前文中的原因不再重复。
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// 描述 reqwest 错误，去掉请求 URL
///
/// 查询参数里带有提供方密钥，URL 不能进入任务台账。
pub fn describe_http_error(err: reqwest::Error) -> String {
    error_chain(&err.without_url())
}
