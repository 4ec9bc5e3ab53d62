pub struct ThemeDefinition {
    pub palette: &'static str,
    pub layout: &'static str,
}

pub fn theme_definition() -> ThemeDefinition {
    ThemeDefinition {
        palette: STUDIO_PALETTE,
        layout: STUDIO_LAYOUT,
    }
}

const STUDIO_PALETTE: &str = r#"
:root {
    --color-bg-primary: #111827;
    --color-bg-secondary: #1f2937;
    --color-bg-overlay: rgba(17, 24, 39, 0.8);
    --color-text-primary: #f3f4f6;
    --color-text-muted: #9ca3af;
    --color-border: #374151;
    --color-accent: #4f46e5;
    --color-accent-hover: #6366f1;
    --color-accent-soft: rgba(99, 102, 241, 0.2);
    --color-success: #4ade80;
    --color-error: #f87171;
    --color-chat-user-bg: #4f46e5;
    --color-chat-user-text: #ffffff;
    --color-chat-ai-bg: #374151;
    --color-chat-ai-text: #f3f4f6;
    --color-link: #a5b4fc;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const STUDIO_LAYOUT: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; }
.app { min-height: 100vh; display: flex; flex-direction: column; align-items: center; padding: 1rem; }
.header { width: 100%; max-width: 80rem; display: flex; justify-content: space-between; align-items: center; padding: 0.5rem 0 1rem; }
.header-title { font-size: 1.25rem; font-weight: 700; color: var(--color-link); }
.header-actions { display: flex; align-items: center; gap: 1rem; }
.autosave-status { width: 6rem; text-align: right; font-size: 0.875rem; color: var(--color-text-muted); }
.autosave-status.saved { color: var(--color-success); }
.switch { position: relative; width: 2.75rem; height: 1.5rem; border-radius: 999px; border: none; background: var(--color-border); cursor: pointer; }
.switch.on { background: var(--color-accent); }
.switch-knob { position: absolute; top: 0.25rem; left: 0.25rem; width: 1rem; height: 1rem; border-radius: 999px; background: #fff; transition: transform 0.2s; }
.switch.on .switch-knob { transform: translateX(1.25rem); }
.btn { display: inline-flex; align-items: center; gap: 0.5rem; padding: 0.5rem 1rem; border-radius: 0.5rem; border: 1px solid var(--color-border); background: var(--color-bg-secondary); color: var(--color-text-primary); font-weight: 600; cursor: pointer; }
.btn:hover { border-color: var(--color-accent-hover); }
.btn:disabled { opacity: 0.5; cursor: not-allowed; }
.btn-primary { background: var(--color-accent); border-color: var(--color-accent); }
.btn-primary:hover { background: var(--color-accent-hover); }
.btn-block { width: 100%; justify-content: center; border-radius: 999px; margin-top: 0.5rem; }
.main { width: 100%; flex: 1; display: flex; justify-content: center; }
.workspace { width: 100%; max-width: 80rem; display: flex; gap: 2rem; flex-wrap: wrap; }
.workspace-left { flex: 2 1 36rem; }
.workspace-right { flex: 1 1 20rem; min-height: 70vh; display: flex; }
.stage { position: relative; aspect-ratio: 16 / 9; background: var(--color-bg-secondary); border: 2px solid var(--color-border); border-radius: 0.5rem; display: flex; align-items: center; justify-content: center; overflow: hidden; }
.stage img { max-width: 100%; max-height: 100%; object-fit: contain; }
.stage-error { position: absolute; top: 0.5rem; left: 0.5rem; right: 0.5rem; padding: 0.75rem; color: var(--color-error); background: var(--color-bg-overlay); border-radius: 0.5rem; display: flex; justify-content: space-between; }
.loader { position: absolute; inset: 0; z-index: 5; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1rem; background: var(--color-bg-overlay); }
.spinner { width: 3rem; height: 3rem; border-radius: 999px; border: 4px solid var(--color-accent-soft); border-top-color: var(--color-accent); animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.uploader { max-width: 40rem; width: 100%; margin: auto; text-align: center; }
.dropzone { display: block; padding: 3rem 2rem; border: 2px dashed var(--color-border); border-radius: 1rem; cursor: pointer; color: var(--color-text-muted); }
.dropzone.dragging { border-color: var(--color-accent); background: var(--color-accent-soft); }
.dropzone input { display: none; }
.comparator { position: relative; width: 100%; height: 100%; user-select: none; }
.comparator img { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: contain; }
.comparator-overlay { position: absolute; inset: 0; }
.comparator-handle { position: absolute; top: 0; bottom: 0; width: 4px; background: #fff; pointer-events: none; }
.comparator-range { position: absolute; inset: 0; width: 100%; height: 100%; opacity: 0; cursor: ew-resize; margin: 0; }
.carousel { display: flex; gap: 1rem; overflow-x: auto; padding: 1rem 0; }
.style-card { flex: 0 0 10rem; border: 2px solid transparent; border-radius: 0.5rem; background: var(--color-bg-secondary); color: inherit; padding: 0; cursor: pointer; text-align: left; overflow: hidden; }
.style-card.active { border-color: var(--color-accent); }
.style-card:disabled { opacity: 0.5; cursor: not-allowed; }
.style-card img { width: 100%; height: 6rem; object-fit: cover; display: block; }
.style-card-name { padding: 0.5rem; font-weight: 600; font-size: 0.875rem; }
.chatbot { flex: 1; display: flex; flex-direction: column; background: var(--color-bg-secondary); border: 1px solid var(--color-border); border-radius: 0.5rem; }
.chat-list { flex: 1; overflow-y: auto; padding: 1rem; display: flex; flex-direction: column; gap: 0.75rem; }
.message-row { display: flex; }
.message-row.user { justify-content: flex-end; }
.bubble { max-width: 85%; padding: 0.5rem 0.75rem; border-radius: 0.75rem; }
.bubble.user { background: var(--color-chat-user-bg); color: var(--color-chat-user-text); }
.bubble.ai { background: var(--color-chat-ai-bg); color: var(--color-chat-ai-text); }
.bubble p { margin: 0; }
.shopping-list { margin: 0.5rem 0 0; padding-left: 1rem; }
.shopping-list a { color: var(--color-link); }
.typing { color: var(--color-text-muted); font-style: italic; }
.composer { display: flex; gap: 0.5rem; padding: 0.75rem; border-top: 1px solid var(--color-border); }
.composer input { flex: 1; padding: 0.5rem 0.75rem; border-radius: 0.5rem; border: 1px solid var(--color-border); background: var(--color-bg-primary); color: var(--color-text-primary); }
.chat-footer { padding: 0 0.75rem 0.75rem; }
.modal-backdrop { position: fixed; inset: 0; z-index: 10; background: rgba(0, 0, 0, 0.7); display: flex; align-items: center; justify-content: center; padding: 1rem; }
.modal { width: 100%; max-width: 64rem; max-height: 90vh; overflow-y: auto; background: var(--color-bg-secondary); border: 1px solid var(--color-border); border-radius: 0.75rem; padding: 1.5rem; }
.modal-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; }
.design-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(20rem, 1fr)); gap: 1.5rem; }
.design-card { display: flex; flex-direction: column; gap: 0.5rem; }
.design-card-header { display: flex; justify-content: space-between; align-items: center; }
.design-card .stage { aspect-ratio: 4 / 3; }
.text-muted { color: var(--color-text-muted); }
"#;
