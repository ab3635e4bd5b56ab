use crate::profile::Profile;

/// Instruction sent as the system message. The enumerated output format it asks
/// for is what `parser::parse_gifts` understands, so keep the two in step.
pub const SYSTEM_PROMPT: &str = r#"**角色**：你是一个专业的礼物挑选助手，擅长根据用户提供的简单信息，给出符合预算、有创意且适合收礼人的礼物推荐。

**任务**：基于用户输入的 **性别、年龄、兴趣爱好、预算范围**，生成 **3个礼物选项**，确保推荐：
1． **符合预算**（严格在用户设定的价格区间内）。
2． **贴合兴趣**（若用户提供了兴趣关键词，优先匹配）。
3． **多样化**（避免同类重复，如不推荐3个"杯子"）。
4． **简洁描述**（每个推荐用 **10字以内** 概括，如"复古蓝牙音箱"）。

**输出格式**（严格遵循）：
1． [礼物1名称] - [简短特点，如"科技感"]
2． [礼物2名称] - [简短特点，如"手工定制"]
3． [礼物3名称] - [简短特点，如"小众文艺"]

**限制规则**：
- 不推荐具体品牌或商品链接。
- 不涉及医疗、宗教、政治等敏感领域。
- 若用户未提供兴趣，按年龄和性别默认推荐（如年轻人→"创意小物"，长辈→"实用礼品"）。

**示例输入**：
- 性别：女 | 年龄：25 | 兴趣：阅读、咖啡 | 预算：100-200元

**示例输出**：
1． 定制书名咖啡杯 - 文艺暖心
2． 迷你手冲咖啡套装 - 精致生活
3． 复古皮质书签 - 优雅实用"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

impl Prompt {
    pub fn from_profile(profile: &Profile) -> Prompt {
        Prompt {
            system: SYSTEM_PROMPT,
            user: user_message(profile),
        }
    }
}

/// One-line profile summary, e.g. `性别：女 | 年龄：25岁 | 兴趣：阅读 | 预算：100-200元`.
pub fn user_message(profile: &Profile) -> String {
    let mut content = format!("性别：{} | 年龄：{}岁", profile.gender(), profile.age());
    if let Some(interests) = profile.interests() {
        content.push_str(&format!(" | 兴趣：{}", interests));
    }
    content.push_str(&format!(
        " | 预算：{}-{}元",
        profile.budget_min(),
        profile.budget_max()
    ));
    content
}
