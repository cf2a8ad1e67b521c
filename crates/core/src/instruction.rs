//! The instruction text sent to the generation service.

/// JSON shape the service is asked to return.
const SCHEMA: &str = r##"{
  "title": "Presentation title",
  "theme": {
    "colorScheme": {
      "primary": "#hexcode",
      "secondary": "#hexcode",
      "accent": "#hexcode",
      "background": "#hexcode",
      "text": "#hexcode"
    },
    "fonts": { "title": "Font name", "body": "Font name" },
    "visualStyle": "Short description of the visual style",
    "layoutPrinciple": "Short description of the layout approach",
    "backgroundStyle": "Short description of the background treatment"
  },
  "sections": [ { "title": "Section title", "order": 1 } ],
  "slides": [
    {
      "id": "slide-1",
      "sectionTitle": "Section this slide belongs to",
      "slideType": "title | content | chart | comparison | conclusion",
      "title": "Slide title",
      "description": "What this slide conveys",
      "layout": {
        "titlePosition": { "x": 0.8, "y": 0.5, "w": 8.4, "h": 1.2, "align": "left" },
        "contentPosition": { "x": 0.8, "y": 2.0, "w": 8.4, "h": 3.2 },
        "titleStyle": { "fontSize": 38, "bold": true },
        "contentStyle": { "fontSize": 24, "bullet": true, "lineSpacing": 1.5 }
      },
      "content": ["Bullet point", "Bullet point"],
      "visualElements": [
        { "type": "shape", "shape": "rectangle", "position": { "x": 0, "y": 0, "w": 0.4, "h": 5.625 }, "color": "#hexcode", "opacity": 0.8 },
        { "type": "text", "text": "Callout", "position": { "x": 5.5, "y": 2.0, "w": 4, "h": 0.5 }, "color": "#hexcode", "fontSize": 22, "bold": true },
        { "type": "chart", "chartType": "bar", "data": { "labels": ["A", "B"], "values": [1, 2] }, "position": { "x": 5.5, "y": 2.2, "w": 4, "h": 3 }, "title": "Chart title" }
      ],
      "speakerNotes": "What the presenter should say",
      "tableData": { "headers": ["Column"], "rows": [["Cell"]], "colW": [2.0] },
      "chartData": { "chartType": "bar", "title": "Chart title", "data": { "labels": ["A"], "values": [1] } },
      "imageData": { "placeholder": "Description of the image" }
    }
  ]
}"##;

/// Build the instruction for a deck about `prompt` with `slide_count` slides.
pub fn build_instruction(prompt: &str, slide_count: usize) -> String {
    format!(
        "Design a presentation about: {prompt}\n\
         \n\
         The deck must have exactly {slide_count} slides.\n\
         \n\
         Respond with a single JSON object of this shape:\n\
         {SCHEMA}\n\
         \n\
         Design requirements:\n\
         - Slides are 16:9, 10 x 5.625 inches; all positions and sizes are in inches.\n\
         - Body text is never smaller than 18pt.\n\
         - Start with a title slide and end with a conclusion slide; use chart and \
         comparison slides where the topic has data or alternatives.\n\
         - Keep bullets short, at most five per slide.\n\
         - Give every slide speaker notes.\n\
         - Colors are 6-digit hex codes.\n\
         \n\
         Return only the JSON object, with no commentary or code fences."
    )
}
