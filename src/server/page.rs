//! HTML served at `GET /`.

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="VPC documentation assistant">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; }}
        .chat {{ display: flex; flex-direction: column; height: 100vh; max-width: 48rem; margin: 0 auto; }}
        .flex-1 {{ flex: 1; overflow-y: auto; padding: 1rem; }}
        .message {{ margin: 0.5rem 0; white-space: pre-wrap; }}
        .message.error {{ color: #b91c1c; }}
        form {{ display: flex; gap: 0.5rem; padding: 1rem; border-top: 1px solid #e5e7eb; }}
        #chat-input {{ flex: 1; padding: 0.5rem 0.75rem; }}
    </style>
</head>
<body>
    {content}
    <script>{script}</script>
</body>
</html>"#
    )
}

/// Chat page content.
pub fn chat_content() -> &'static str {
    r#"
    <div class="chat">
        <div id="messages" class="flex-1" aria-live="polite" aria-label="Chat messages"></div>
        <form id="chat-form" autocomplete="off">
            <input id="chat-input" name="query" type="text" placeholder="Ask about VPC networking..." required>
            <button type="submit">Send</button>
        </form>
    </div>
    "#
}

/// Browser-side submission handler for the chat form.
///
/// Same contract as `chat::SubmissionHandler`: clear and echo at once,
/// one request per submission, replies appended in submission order.
pub fn chat_script() -> &'static str {
    r#"
document.addEventListener('DOMContentLoaded', () => {
    const form = document.getElementById('chat-form');
    const input = document.getElementById('chat-input');
    const messages = document.getElementById('messages');
    let queue = Promise.resolve();

    function appendMessage(sender, text, cls) {
        const div = document.createElement('div');
        div.classList.add('message');
        if (cls) div.classList.add(cls);
        const label = document.createElement('strong');
        label.textContent = sender + ':';
        div.append(label, ' ', text);
        messages.appendChild(div);
        messages.scrollTop = messages.scrollHeight;
    }

    async function ask(query) {
        const res = await fetch(window.location.pathname, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ query })
        });
        const body = await res.text();
        if (!res.ok) throw new Error('server returned ' + res.status + ': ' + body);
        const data = JSON.parse(body);
        if (typeof data.response !== 'string') throw new Error('response has no `response` field');
        return data.response;
    }

    form.addEventListener('submit', (e) => {
        e.preventDefault();
        const query = input.value;
        input.value = '';
        appendMessage('You', query);
        queue = queue.then(() => ask(query).then(
            (answer) => appendMessage('Assistant', answer),
            (err) => appendMessage('Error', err.message, 'error')
        ));
    });
});
"#
}

/// Full chat page.
pub fn chat_page() -> String {
    html_shell("VPC Docs Assistant", chat_content(), chat_script())
}
