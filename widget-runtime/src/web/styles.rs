//! Built-in styles and icons for the launcher, badge and panel.

/// Id of the injected `<style>` element
pub const STYLE_ELEMENT_ID: &str = "chat-widget-styles";

pub const BASE_CSS: &str = r#"
#chat-widget-launcher.chat-button {
  position: fixed;
  z-index: 2147483646;
  display: flex;
  align-items: center;
  justify-content: center;
  min-width: 56px;
  height: 56px;
  padding: 0 16px;
  border: none;
  border-radius: 28px;
  color: #fff;
  font: 600 15px/1 system-ui, sans-serif;
  cursor: pointer;
  box-shadow: 0 4px 16px rgba(0, 0, 0, 0.2);
}
#chat-widget-launcher svg { width: 26px; height: 26px; fill: currentColor; }
#chat-widget-badge {
  position: absolute;
  top: -4px;
  right: -4px;
  display: none;
  min-width: 20px;
  height: 20px;
  padding: 0 6px;
  border-radius: 10px;
  background: #dc2626;
  color: #fff;
  font: 700 12px/20px system-ui, sans-serif;
  text-align: center;
}
#chat-widget-badge.show { display: block; }
#chat-widget-badge.pulse { animation: chat-widget-pulse 600ms ease-out; }
@keyframes chat-widget-pulse {
  0% { transform: scale(1); }
  50% { transform: scale(1.35); }
  100% { transform: scale(1); }
}
#chat-widget-panel {
  position: fixed;
  z-index: 2147483645;
  border: none;
  background: #fff;
  box-shadow: 0 8px 32px rgba(0, 0, 0, 0.25);
  visibility: hidden;
  opacity: 0;
}
#chat-widget-panel.pop {
  bottom: 96px;
  width: 380px;
  height: min(640px, calc(100vh - 120px));
  border-radius: 12px;
  transform: translateY(16px);
  transition: opacity 200ms ease, transform 200ms ease;
}
#chat-widget-panel.pop.position-br { right: 24px; }
#chat-widget-panel.pop.position-bl { left: 24px; }
#chat-widget-panel.slider {
  width: 420px;
  transition: transform 300ms ease;
}
#chat-widget-panel.slider.position-br { transform: translateX(100%); }
#chat-widget-panel.slider.position-bl { transform: translateX(-100%); }
#chat-widget-panel.open { visibility: visible; opacity: 1; transform: none; }
#chat-widget-panel.slider.open { transform: none; }
#chat-widget-panel.slider.position-br.closing { transform: translateX(100%); }
#chat-widget-panel.slider.position-bl.closing { transform: translateX(-100%); }
"#;

pub const CHAT_ICON: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true"><path d="M4 4h16a2 2 0 0 1 2 2v10a2 2 0 0 1-2 2H8l-4 4V6a2 2 0 0 1 2-2z"/></svg>"#;

pub const CLOSE_ICON: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true"><path d="M18.3 5.7 12 12l6.3 6.3-1.4 1.4L10.6 13.4 4.3 19.7 2.9 18.3 9.2 12 2.9 5.7l1.4-1.4 6.3 6.3 6.3-6.3z"/></svg>"#;
