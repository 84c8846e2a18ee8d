//! Chat-completion request bodies

use serde_json::{json, Value};

/// Low randomness keeps verdicts stable across calls
const TEMPERATURE: f64 = 0.1;
const MAX_TOKENS: u32 = 500;

const COMPLIANCE_SYSTEM_PROMPT: &str = "你是一个专业的内容合规审核助手。\
你只能返回一个JSON对象，不要输出任何其他文字。JSON格式如下：\
{\"result\": \"PASS\" 或 \"FAIL\", \
\"risk_level\": \"LOW\" 或 \"MEDIUM\" 或 \"HIGH\", \
\"risk_categories\": \"违规类别（逗号分隔，无违规则为空字符串）\", \
\"detail\": \"详细说明\"}";

const IDENTIFIER_SYSTEM_PROMPT: &str = "你是一个个人信息识别助手。\
你只能返回一个JSON对象，不要输出任何其他文字。JSON格式如下：\
{\"id_cards\": [\"身份证号\"], \"phones\": [\"手机号\"]}，未找到时返回空数组。";

fn compliance_user_prompt(content: &str) -> String {
    format!(
        "请判断以下文本内容是否合规。评估维度包括：\n\
         1. 是否包含违法违规信息\n\
         2. 是否包含色情、暴力、恐怖内容\n\
         3. 是否包含歧视、仇恨言论\n\
         4. 是否包含虚假信息或诈骗内容\n\
         5. 是否包含侵犯隐私的信息\n\n\
         待检测内容：\n{}",
        content
    )
}

fn identifier_user_prompt(content: &str) -> String {
    format!(
        "请找出以下文本中出现的所有中国大陆居民身份证号码（18位）和手机号码，\
         按原文逐字返回。\n\n待检测内容：\n{}",
        content
    )
}

fn chat_request(model: &str, system: &str, user: String) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    })
}

/// Request asking for a compliance verdict on `content`
pub fn compliance_request(model: &str, content: &str) -> Value {
    chat_request(model, COMPLIANCE_SYSTEM_PROMPT, compliance_user_prompt(content))
}

/// Request asking for the identifiers contained in `content`
pub fn identifier_request(model: &str, content: &str) -> Value {
    chat_request(model, IDENTIFIER_SYSTEM_PROMPT, identifier_user_prompt(content))
}
