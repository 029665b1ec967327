use crate::models::Status;
use crate::variant::Variant;

pub fn render_index(variant: Variant) -> String {
    let copy = variant.copy();
    let maybe_button = if variant.offers(Status::Maybe) {
        format!(
            r#"<button class="status" data-status="maybe">{} <span data-count="maybe">0</span></button>"#,
            copy.maybe
        )
    } else {
        String::new()
    };

    INDEX_HTML
        .replace("{{LANG}}", variant.lang())
        .replace("{{TITLE}}", copy.title)
        .replace("{{JOIN}}", copy.join)
        .replace("{{PASS}}", copy.pass)
        .replace("{{MAYBE_BUTTON}}", &maybe_button)
        .replace("{{STARTING_SOON}}", copy.starting_soon)
        .replace("{{STATUS_FAILED}}", copy.status_update_failed)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --ink: #1f2a2e;
      --card: rgba(255, 255, 255, 0.9);
      --green: #22c55e;
      --yellow: #eab308;
      --gray: #9ca3af;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, #ecfdf5, #f0fdfa 60%, #f8fafc 100%);
      color: var(--ink);
      font-family: system-ui, sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 16px;
    }

    .app {
      width: min(640px, 100%);
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 24px;
      padding: 24px;
      box-shadow: 0 16px 40px rgba(15, 118, 110, 0.12);
    }

    .headcount {
      color: white;
      text-align: center;
      transition: background 300ms ease;
    }

    .headcount[data-color="green"] { background: var(--green); }
    .headcount[data-color="yellow"] { background: var(--yellow); }
    .headcount[data-color="gray"] { background: var(--gray); }

    .headcount .count {
      font-size: 3.5rem;
      font-weight: 700;
    }

    .buttons {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    button {
      border: none;
      border-radius: 16px;
      padding: 14px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: #f3f4f6;
    }

    button.active {
      background: #0f766e;
      color: white;
    }

    input {
      width: 100%;
      padding: 12px 14px;
      border-radius: 14px;
      border: 2px solid #e5e7eb;
      font-size: 1rem;
      margin-bottom: 10px;
    }

    .error {
      color: #dc2626;
      min-height: 1.2em;
    }

    .roster {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .roster li {
      display: flex;
      justify-content: space-between;
      padding: 10px 14px;
      border-radius: 12px;
      background: #f9fafb;
    }

    .roster li.me {
      outline: 2px solid #5eead4;
    }

    .hidden {
      display: none;
    }
  </style>
</head>
<body>
  <main class="app">
    <section id="register" class="card hidden">
      <h1>{{TITLE}}</h1>
      <input id="nickname" maxlength="10" autocomplete="off" />
      <div id="register-error" class="error"></div>
      <button id="register-button">OK</button>
    </section>

    <section id="board" class="hidden">
      <header class="card">
        <h1>{{TITLE}}</h1>
        <p id="date"></p>
        <p><strong id="me"></strong> <button id="change-nickname">✎</button></p>
      </header>
      <div id="headcount" class="card headcount" data-color="gray">
        <div class="count" id="join-count">0</div>
        <div id="message"></div>
        <div id="starting-soon" class="hidden">{{STARTING_SOON}}</div>
      </div>
      <div class="card buttons">
        <button class="status" data-status="join">{{JOIN}} <span data-count="join">0</span></button>
        {{MAYBE_BUTTON}}
        <button class="status" data-status="pass">{{PASS}} <span data-count="pass">0</span></button>
      </div>
      <div class="card">
        <ul id="roster" class="roster"></ul>
      </div>
    </section>
  </main>

  <script>
    const registerEl = document.getElementById('register');
    const boardEl = document.getElementById('board');
    const nicknameEl = document.getElementById('nickname');
    const registerErrorEl = document.getElementById('register-error');
    const statusButtons = Array.from(document.querySelectorAll('button.status'));

    let board = null;
    let socket = null;

    const postJson = async (url, body) => {
      const response = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!response.ok) {
        throw new Error(await response.text());
      }
      return response.json();
    };

    const render = (next) => {
      board = next;
      document.getElementById('date').textContent = next.date_label;
      document.getElementById('me').textContent = next.nickname || '';
      document.getElementById('headcount').dataset.color = next.color;
      document.getElementById('join-count').textContent = next.counts.join;
      document.getElementById('message').textContent = next.message;
      document.getElementById('starting-soon').classList.toggle('hidden', !next.starting_soon);
      document.querySelectorAll('[data-count]').forEach((el) => {
        el.textContent = next.counts[el.dataset.count];
      });
      statusButtons.forEach((button) => {
        button.classList.toggle('active', button.dataset.status === next.my_status);
      });

      const roster = document.getElementById('roster');
      roster.replaceChildren(...next.participants.map((participant) => {
        const item = document.createElement('li');
        if (participant.nickname === next.nickname) {
          item.classList.add('me');
        }
        const name = document.createElement('span');
        name.textContent = participant.nickname;
        const time = document.createElement('span');
        time.textContent = participant.time;
        item.append(name, time);
        return item;
      }));
    };

    const connect = () => {
      if (socket) {
        socket.close();
      }
      const scheme = location.protocol === 'https:' ? 'wss' : 'ws';
      socket = new WebSocket(`${scheme}://${location.host}/api/live`);
      socket.onmessage = (event) => render(JSON.parse(event.data));
      socket.onclose = () => setTimeout(connect, 3000);
    };

    const showBoard = () => {
      registerEl.classList.add('hidden');
      boardEl.classList.remove('hidden');
      connect();
    };

    const showRegister = () => {
      if (socket) {
        socket.onclose = null;
        socket.close();
        socket = null;
      }
      boardEl.classList.add('hidden');
      registerEl.classList.remove('hidden');
      nicknameEl.value = '';
    };

    const register = async () => {
      registerErrorEl.textContent = '';
      try {
        await postJson('/api/register', { nickname: nicknameEl.value });
        showBoard();
      } catch (err) {
        registerErrorEl.textContent = err.message;
      }
    };

    document.getElementById('register-button').addEventListener('click', register);
    nicknameEl.addEventListener('keydown', (event) => {
      if (event.key === 'Enter') {
        register();
      }
    });
    nicknameEl.addEventListener('input', () => {
      registerErrorEl.textContent = '';
    });

    statusButtons.forEach((button) => {
      button.addEventListener('click', async () => {
        const picked = button.dataset.status;
        const status = board && board.my_status === picked ? 'none' : picked;
        try {
          render(await postJson('/api/status', { status }));
        } catch (err) {
          alert('{{STATUS_FAILED}}');
        }
      });
    });

    document.getElementById('change-nickname').addEventListener('click', async () => {
      try {
        await postJson('/api/nickname/release');
      } catch (err) {
        console.error(err);
      }
      showRegister();
    });

    fetch('/api/me')
      .then((response) => response.json())
      .then((me) => (me.registered ? showBoard() : showRegister()))
      .catch(showRegister);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maybe_button_only_on_classic_board() {
        assert!(render_index(Variant::Classic).contains(r#"data-status="maybe""#));
        assert!(!render_index(Variant::Korean).contains(r#"data-status="maybe""#));
    }

    #[test]
    fn placeholders_are_filled() {
        let page = render_index(Variant::Japanese);
        assert!(page.contains(r#"<html lang="ja">"#));
        assert!(page.contains("参加します"));
        assert!(!page.contains("{{"));
    }
}
