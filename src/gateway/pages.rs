//! HTML pages served by the intake gateway

use crate::types::prediction::label_from_wire;

/// Input form posting back to `action`
pub fn input_form(action: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Heart Disease Check</title>
</head>
<body>
  <h1>Heart Disease Check</h1>
  <form method="post" action="{action}">
    <label>Age <input type="number" name="age" min="0" required></label><br>
    <label>Sex
      <select name="sex">
        <option value="0">Female</option>
        <option value="1">Male</option>
      </select>
    </label><br>
    <label>Chest pain type
      <select name="chestpain">
        <option value="0">Asymptomatic</option>
        <option value="1">Atypical angina</option>
        <option value="2">Non-anginal pain</option>
        <option value="3">Typical angina</option>
      </select>
    </label><br>
    <label>Cholesterol (mg/dl) <input type="number" name="cholesterol" min="0" required></label><br>
    <label>Fasting blood sugar &gt; 120 mg/dl
      <select name="fastingbs">
        <option value="0">No</option>
        <option value="1">Yes</option>
      </select>
    </label><br>
    <label>Maximum heart rate <input type="number" name="maxhr" min="0" required></label><br>
    <label>Exercise-induced angina
      <select name="exerciseangina">
        <option value="0">No</option>
        <option value="1">Yes</option>
      </select>
    </label><br>
    <label>Oldpeak <input type="number" name="oldpeak" step="0.1" required></label><br>
    <label>ST slope
      <select name="stslope">
        <option value="0">Down</option>
        <option value="1">Flat</option>
        <option value="2">Up</option>
      </select>
    </label><br>
    <button type="submit">Check</button>
  </form>
</body>
</html>
"#,
        action = escape_html(action)
    )
}

/// Result page for a label returned by the prediction service
pub fn response_page(result: &str) -> String {
    let verdict = match label_from_wire(result) {
        Some(true) => "The model predicts a risk of heart disease.",
        Some(false) => "The model predicts no heart disease.",
        None => "The model returned an unrecognised result.",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Heart Disease Check - Result</title>
</head>
<body>
  <h1>Prediction</h1>
  <p id="result">{result}</p>
  <p>{verdict}</p>
  <a href="/checkheartdisease">Check another patient</a>
</body>
</html>
"#,
        result = escape_html(result),
        verdict = verdict
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
