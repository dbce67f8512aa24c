//! Translation tables for user-facing strings.
//!
//! Keys are the English strings themselves; `t` falls back to the key when the
//! current language has no entry, so English is always the identity mapping.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

/// Supported languages with their display labels.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh-Hans", "简体中文"),
    ("zh-Hant", "繁體中文"),
];

static CURRENT_LANGUAGE: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new("en".to_string()));

static ZH_HANS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Chat with the AI", "与 AI 聊天"),
        ("Configure the CLI", "配置此命令行工具"),
        ("Generate a commit message for staged changes", "为暂存的变更生成提交信息"),
        ("Starting new conversation", "开始新的对话"),
        ("You", "你"),
        ("send a message ('exit' to quit)", "发送消息（输入 'exit' 退出）"),
        ("Thinking...", "思考中..."),
        ("Goodbye!", "再见！"),
        ("Set config", "设置配置"),
        ("OpenAI Key", "OpenAI 密钥"),
        ("OpenAI API Endpoint", "OpenAI API 端点"),
        ("Silent Mode", "静默模式"),
        ("Model", "模型"),
        ("Language", "语言"),
        ("(not set)", "（未设置）"),
        ("Exit", "退出"),
        ("Exit the program", "退出程序"),
        ("Enter your OpenAI API key", "输入你的 OpenAI API 密钥"),
        ("Enter your OpenAI API Endpoint", "输入你的 OpenAI API 端点"),
        ("Enable silent mode?", "启用静默模式？"),
        ("Pick a model", "选择一个模型"),
        ("Pick a language", "选择语言"),
        ("Invalid config property", "无效的配置项"),
        ("No staged changes to commit", "没有已暂存的变更可提交"),
        ("Commit with this message?", "使用这条提交信息吗？"),
        ("Commit aborted", "已取消提交"),
        ("Please open a bug report with the information above", "请携带以上信息提交问题报告"),
    ])
});

static ZH_HANT: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Chat with the AI", "與 AI 聊天"),
        ("Configure the CLI", "設定此命令列工具"),
        ("Generate a commit message for staged changes", "為暫存的變更產生提交訊息"),
        ("Starting new conversation", "開始新的對話"),
        ("You", "你"),
        ("send a message ('exit' to quit)", "傳送訊息（輸入 'exit' 離開）"),
        ("Thinking...", "思考中..."),
        ("Goodbye!", "再見！"),
        ("Set config", "設定組態"),
        ("OpenAI Key", "OpenAI 金鑰"),
        ("OpenAI API Endpoint", "OpenAI API 端點"),
        ("Silent Mode", "靜默模式"),
        ("Model", "模型"),
        ("Language", "語言"),
        ("(not set)", "（未設定）"),
        ("Exit", "離開"),
        ("Exit the program", "離開程式"),
        ("Enter your OpenAI API key", "輸入你的 OpenAI API 金鑰"),
        ("Enter your OpenAI API Endpoint", "輸入你的 OpenAI API 端點"),
        ("Enable silent mode?", "啟用靜默模式？"),
        ("Pick a model", "選擇一個模型"),
        ("Pick a language", "選擇語言"),
        ("Invalid config property", "無效的設定項"),
        ("No staged changes to commit", "沒有已暫存的變更可提交"),
        ("Commit with this message?", "使用這條提交訊息嗎？"),
        ("Commit aborted", "已取消提交"),
        ("Please open a bug report with the information above", "請附上以上資訊回報問題"),
    ])
});

fn table_for(lang: &str) -> Option<&'static HashMap<&'static str, &'static str>> {
    match lang {
        "zh-Hans" => Some(&ZH_HANS),
        "zh-Hant" => Some(&ZH_HANT),
        _ => None,
    }
}

/// Sets the process-wide language. Unknown or empty codes behave as English.
pub fn set_language(lang: &str) {
    let lang = if lang.is_empty() { "en" } else { lang };
    let mut current = CURRENT_LANGUAGE.write().expect("language lock poisoned");
    *current = lang.to_string();
}

/// Translates `key` into the current language, or returns it unchanged.
pub fn t(key: &str) -> String {
    let current = CURRENT_LANGUAGE.read().expect("language lock poisoned");
    table_for(&current)
        .and_then(|table| table.get(key).copied())
        .unwrap_or(key)
        .to_string()
}

/// Display label for a language code, if known.
pub fn language_label(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}
