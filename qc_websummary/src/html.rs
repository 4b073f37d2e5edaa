use crate::{AlertSpec, CardWithTable, ChartWithHelp, ScoreBar};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

/// Location of the Plotly bundle loaded by the rendered page.
pub const DEFAULT_PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// One piece of content within a report section.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// Key/value list, e.g. the general run information.
    Definitions(Vec<(String, String)>),
    Table(CardWithTable),
    Chart { id: String, chart: ChartWithHelp },
    ScoreBar(ScoreBar),
    /// Inline legend of coloured labels: (label, color).
    Legend(Vec<(String, String)>),
    Paragraph(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub anchor: String,
    pub name: String,
    pub description: String,
    pub alerts: Vec<AlertSpec>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(anchor: impl ToString, name: impl ToString, description: impl ToString) -> Self {
        Section {
            anchor: anchor.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            alerts: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

/// The whole report: a title and the rendered sections in order.
#[derive(Debug, Clone, Serialize)]
pub struct WebSummary {
    pub title: String,
    pub subtitle: String,
    #[serde(skip)]
    pub plotly_js: String,
    pub sections: Vec<Section>,
}

impl WebSummary {
    pub fn new(title: impl ToString, subtitle: impl ToString) -> Self {
        WebSummary {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            plotly_js: DEFAULT_PLOTLY_JS.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let mut html = String::with_capacity(64 * 1024);
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\"/>")?;
        writeln!(html, "<title>{}</title>", escape(&self.title))?;
        writeln!(html, "<script src=\"{}\"></script>", escape(&self.plotly_js))?;
        writeln!(html, "<style>{STYLE}</style>")?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<h1>{}</h1>", escape(&self.title))?;
        if !self.subtitle.is_empty() {
            writeln!(html, "<div class=\"meta\">{}</div>", escape(&self.subtitle))?;
        }

        writeln!(html, "<nav><ul>")?;
        for s in &self.sections {
            writeln!(
                html,
                "<li><a href=\"#{}\">{}</a></li>",
                escape(&s.anchor),
                escape(&s.name)
            )?;
        }
        writeln!(html, "</ul></nav>")?;

        for s in &self.sections {
            write_section(&mut html, s)?;
        }
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }
}

const STYLE: &str = "\
body{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}\
h1{margin:0 0 8px 0;font-size:24px;}\
h2{margin:28px 0 8px 0;font-size:20px;border-top:1px solid #eee;padding-top:12px;}\
h4{margin:16px 0 4px 0;}\
.meta{color:#555;font-size:13px;margin-bottom:16px;}\
.desc,.help{color:#444;font-size:13px;max-width:1000px;margin:4px 0 10px 0;}\
table.qc{border-collapse:collapse;font-size:13px;margin:6px 0 16px 0;}\
table.qc th,table.qc td{border:1px solid #ddd;padding:4px 8px;text-align:right;}\
table.qc th:first-child,table.qc td:first-child{text-align:left;}\
dl.info dt{float:left;clear:left;width:250px;font-weight:bold;}\
dl.info dd{margin-left:260px;}\
.alert{padding:6px 10px;margin:6px 0;border-radius:3px;}\
.alert-warn{background:#fff3cd;}.alert-info{background:#d1ecf1;}\
.score-track{width:50%;height:35px;}\
.score-arrow{height:35px;text-align:right;white-space:nowrap;}\
.score-bar{display:flex;height:22px;color:#fff;font-size:13px;}\
.score-bar div{text-align:center;line-height:22px;}\
.score-scale{position:relative;height:20px;color:#9f9fa3;font-size:14px;}\
.score-scale span{position:absolute;}\
.plot{width:100%;max-width:900px;height:450px;}\
.legend span{font-weight:bold;margin-right:12px;}";

fn write_section(html: &mut String, s: &Section) -> Result<()> {
    writeln!(html, "<section id=\"{}\">", escape(&s.anchor))?;
    writeln!(html, "<h2>{}</h2>", escape(&s.name))?;
    if !s.description.is_empty() {
        writeln!(html, "<p class=\"desc\">{}</p>", escape(&s.description))?;
    }
    for alert in &s.alerts {
        let title = if alert.formatted_value.is_empty() {
            escape(&alert.title)
        } else {
            format!("{} ({})", escape(&alert.title), escape(&alert.formatted_value))
        };
        writeln!(
            html,
            "<div class=\"alert {}\"><b>{title}</b> {}</div>",
            alert.level.css_class(),
            escape(&alert.message)
        )?;
    }
    for block in &s.blocks {
        write_block(html, block)?;
    }
    writeln!(html, "</section>")?;
    Ok(())
}

fn write_block(html: &mut String, block: &Block) -> Result<()> {
    match block {
        Block::Definitions(items) => {
            writeln!(html, "<dl class=\"info\">")?;
            for (k, v) in items {
                writeln!(html, " <dt>{}</dt>\n <dd>{}</dd>", escape(k), escape(v))?;
            }
            writeln!(html, "</dl>")?;
        }
        Block::Table(card) => write_table(html, card)?,
        Block::Chart { id, chart } => {
            if !chart.help.title.is_empty() {
                writeln!(html, "<h4>{}</h4>", escape(&chart.help.title))?;
            }
            if !chart.help.help.is_empty() {
                writeln!(html, "<p class=\"help\">{}</p>", escape(&chart.help.help))?;
            }
            writeln!(html, "<div id=\"{}\" class=\"plot\"></div>", escape(id))?;
            writeln!(
                html,
                "<script>Plotly.newPlot(\"{}\", {}, {}, {});</script>",
                escape(id),
                script_json(&chart.plot.data)?,
                script_json(&chart.plot.layout)?,
                script_json(&chart.plot.config)?
            )?;
        }
        Block::ScoreBar(bar) => write_score_bar(html, bar)?,
        Block::Legend(items) => {
            write!(html, "<p class=\"legend\">")?;
            for (label, color) in items {
                write!(
                    html,
                    "<span style=\"color:{}\">{}</span>",
                    escape(color),
                    escape(label)
                )?;
            }
            writeln!(html, "</p>")?;
        }
        Block::Paragraph(text) => writeln!(html, "<p class=\"desc\">{}</p>", escape(text))?,
    }
    Ok(())
}

fn write_table(html: &mut String, card: &CardWithTable) -> Result<()> {
    if !card.help.title.is_empty() {
        writeln!(html, "<h4>{}</h4>", escape(&card.help.title))?;
    }
    if !card.help.help.is_empty() {
        writeln!(html, "<p class=\"help\">{}</p>", escape(&card.help.help))?;
    }
    writeln!(html, "<table class=\"qc\">")?;
    if let Some(header) = &card.table.header {
        write!(html, "<tr>")?;
        for h in header {
            write!(html, "<th>{}</th>", escape(h))?;
        }
        writeln!(html, "</tr>")?;
    }
    for row in &card.table.rows {
        write!(html, "<tr>")?;
        for cell in &row.0 {
            write!(html, "<td>{}</td>", escape(cell))?;
        }
        writeln!(html, "</tr>")?;
    }
    writeln!(html, "</table>")?;
    Ok(())
}

fn write_score_bar(html: &mut String, bar: &ScoreBar) -> Result<()> {
    writeln!(html, "<div class=\"score-track\">")?;
    writeln!(
        html,
        "<div class=\"score-arrow\" style=\"width:{:.2}%\"><b>{}</b> &#9660;</div>",
        bar.marker_percent,
        escape(&bar.score_label())
    )?;
    writeln!(html, "</div>")?;
    writeln!(html, "<div class=\"score-bar\">")?;
    for (name, color, width) in &bar.segments {
        writeln!(
            html,
            "<div style=\"width:{width:.2}%;background:{}\"><b>{}</b></div>",
            escape(color),
            escape(name)
        )?;
    }
    writeln!(html, "</div>")?;
    writeln!(html, "<div class=\"score-scale\">")?;
    for tick in &bar.ticks {
        writeln!(
            html,
            "<span style=\"left:{:.2}%\">{}</span>",
            tick.left_percent,
            escape(&tick.label)
        )?;
    }
    writeln!(html, "</div>")?;
    Ok(())
}

/// JSON for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlertSpec, GenericTable, TableRow, TitleWithHelp};

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_to_html() {
        let mut summary = WebSummary::new("Quartet DNA-seq Report", "");
        let mut section = Section::new("general_information", "Data Generation Information", "");
        section.push(Block::Definitions(vec![(
            "Platform".to_string(),
            "ILLUMINA".to_string(),
        )]));
        section.alerts.push(AlertSpec::warn("Incomplete input", "No row for M8"));
        section.push(Block::Table(CardWithTable {
            table: GenericTable {
                header: Some(vec!["Sample".to_string(), "%GC".to_string()]),
                rows: vec![TableRow::two_col("LCL5", "41.20")],
            },
            help: TitleWithHelp {
                title: "Summary metrics".to_string(),
                help: String::new(),
            },
        }));
        summary.sections.push(section);

        let html = summary.to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<a href=\"#general_information\">Data Generation Information</a>"));
        assert!(html.contains("<dt>Platform</dt>"));
        assert!(html.contains("<th>%GC</th>"));
        assert!(html.contains("<td>41.20</td>"));
        assert!(html.contains("alert alert-warn"));
        assert!(html.contains(DEFAULT_PLOTLY_JS));
    }

    #[test]
    fn test_script_json() {
        let v = serde_json::json!({"name": "</script>"});
        assert_eq!(script_json(&v).unwrap(), r#"{"name":"<\/script>"}"#);
    }
}
