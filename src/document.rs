//! The generated tabloid document.
//!
//! Field names follow the JSON shape requested from the generation service
//! (camelCase). Every field is required when parsing; content is otherwise
//! taken verbatim.

use serde::{Deserialize, Serialize};

/// Structured content for one tabloid, produced fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub main_title: String,
    pub subtitle: String,
    pub introduction: TextSection,
    pub main_article: TextSection,
    pub poem: Poem,
    pub slogans: Slogans,
    pub knowledge_corner: TextSection,
    pub illustration_ideas: IllustrationIdeas,
}

/// A titled block of body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub title: String,
    pub author: String,
    /// Verse lines in reading order
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slogans {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustrationIdeas {
    pub title: String,
    pub items: Vec<IllustrationIdea>,
}

/// A drawing suggestion plus line art for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IllustrationIdea {
    pub description: String,
    /// SVG path data (`d` attribute) drawn in a 100x100 coordinate space
    pub svg_path: String,
}

impl GeneratedDocument {
    /// Parse the service's text payload. Surrounding whitespace is ignored.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
      "mainTitle": "强国有我",
      "subtitle": "庆祝建军节，致敬最可爱的人",
      "introduction": {"title": "卷首语", "content": "青春正当时。"},
      "mainArticle": {"title": "铁血军魂", "content": "阅兵展示了国家实力。"},
      "poem": {"title": "致祖国", "author": "一位爱国的少年", "content": ["第一行", "第二行"]},
      "slogans": {"title": "青春誓言", "items": ["强国有我", "请党放心"]},
      "knowledgeCorner": {"title": "国防小百科", "content": "知识点。"},
      "illustrationIdeas": {"title": "创意插画角", "items": [
        {"description": "和平鸽", "svgPath": "M50 10 C 20 20, 20 60, 50 90 Z"}
      ]}
    }
    "#;

    #[test]
    fn parses_camel_case_payload() {
        let doc = GeneratedDocument::from_json(SAMPLE).expect("parse");
        assert_eq!(doc.main_title, "强国有我");
        assert_eq!(doc.poem.content, vec!["第一行", "第二行"]);
        assert_eq!(doc.illustration_ideas.items[0].svg_path, "M50 10 C 20 20, 20 60, 50 90 Z");
        assert_eq!(doc.knowledge_corner.title, "国防小百科");
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value.as_object_mut().unwrap().remove("poem");
        assert!(GeneratedDocument::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn serializes_back_to_camel_case() {
        let doc = GeneratedDocument::from_json(SAMPLE).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("mainArticle").is_some());
        assert!(value["illustrationIdeas"]["items"][0].get("svgPath").is_some());
    }
}
