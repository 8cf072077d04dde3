use chrono::NaiveDate;
use reqwest::Client;

use crate::email::{Attachment, EmailChannel};
use crate::outcome::{ChannelOutcome, NotificationReport};
use crate::qr;
use crate::whatsapp::WhatsAppChannel;

/// Everything the gateway needs from the environment, injected at startup.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub whatsapp_enabled: bool,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_whatsapp_from: Option<String>,
}

/// Everything needed to confirm one escape-room reservation to one person.
#[derive(Debug, Clone)]
pub struct ReservationNotice {
    pub first_name: String,
    pub email: String,
    pub whatsapp: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub token: String,
}

/// Uniform "attempt, report, never throw" front over both channels.
pub struct Notifier {
    email: EmailChannel,
    whatsapp: WhatsAppChannel,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        let http = Client::new();
        Self {
            email: EmailChannel::new(
                config.resend_api_key,
                config.from_email,
                http.clone(),
            ),
            whatsapp: WhatsAppChannel::new(
                config.whatsapp_enabled,
                config.twilio_account_sid,
                config.twilio_auth_token,
                config.twilio_whatsapp_from,
                http,
            ),
        }
    }

    /// Confirm a reservation over both channels; outcomes are reported, not
    /// raised.
    pub async fn send_reservation(&self, notice: &ReservationNotice) -> NotificationReport {
        let email = self
            .email
            .send(
                &notice.email,
                "🎟️ Tu reserva para el Escape Room",
                &reservation_email_html(notice),
                vec![qr_attachment(&notice.token)],
            )
            .await;

        let whatsapp = self
            .whatsapp
            .send(&notice.whatsapp, reservation_whatsapp_body(notice))
            .await;

        NotificationReport { email, whatsapp }
    }

    /// Festival QR ticket, email only (the original flow mails the QR and
    /// nothing else on registration).
    pub async fn send_festival_ticket(
        &self,
        email: &str,
        first_name: &str,
        ticket_id: &str,
    ) -> ChannelOutcome {
        self.email
            .send(
                email,
                "🎟️ Tu entrada para Wormy PowerFest",
                &festival_email_html(first_name, ticket_id),
                vec![qr_attachment(ticket_id)],
            )
            .await
    }

    /// Staff-triggered WhatsApp copy of the festival ticket.
    pub async fn send_festival_whatsapp(
        &self,
        phone: &str,
        first_name: &str,
        ticket_id: &str,
    ) -> ChannelOutcome {
        let body = format!(
            "🎟️ ¡Hola {first_name}!\n\nTu entrada para Wormy PowerFest está lista.\nID de tu ticket: {ticket_id}\n\nRevisa tu correo para ver el código QR y preséntalo en la entrada del evento."
        );
        self.whatsapp.send(phone, body).await
    }
}

fn qr_attachment(token: &str) -> Attachment {
    // Rendering cannot fail for the uuid-sized payloads used here; fall
    // back to an empty attachment body rather than dropping the email.
    let data_url = qr::render(token)
        .map(|ticket| ticket.data_url)
        .unwrap_or_default();
    let content = data_url
        .strip_prefix("data:image/svg+xml;base64,")
        .unwrap_or_default()
        .to_string();
    Attachment {
        filename: "qr-code.svg".into(),
        content,
        content_type: "image/svg+xml".into(),
        content_id: Some("<qrcode>".into()),
        disposition: "inline",
    }
}

fn format_date_es(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn festival_email_html(first_name: &str, ticket_id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h1 style="color: #E91E8C;">¡Hola {first_name}! 🐛</h1>
      <p>Tu registro para <strong>Wormy PowerFest</strong> ha sido confirmado.</p>
      <div style="background: #f5f5f5; padding: 30px; border-radius: 10px; text-align: center;">
        <h2>Tu Código QR</h2>
        <img src="cid:qrcode" alt="QR Code" style="max-width: 300px;"/>
        <p style="font-family: monospace; color: #666; font-size: 14px;">ID: {ticket_id}</p>
      </div>
      <p>Presenta este código QR en la entrada del evento.</p>
      <p style="color: #666; font-size: 12px; border-top: 1px solid #ddd; padding-top: 20px;">
        Wormy PowerFest - El evento deportivo más divertido del año
      </p>
    </div>
  </body>
</html>"#
    )
}

fn reservation_email_html(notice: &ReservationNotice) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h1 style="color: #1E88E5;">¡Hola {first_name}! 🔐</h1>
      <p>Tu reserva para el <strong>Escape Room</strong> ha sido confirmada.</p>
      <ul>
        <li>Fecha: {date}</li>
        <li>Hora: {start} - {end}</li>
        <li>Duración: 15 minutos</li>
      </ul>
      <div style="background: #f5f5f5; padding: 30px; border-radius: 10px; text-align: center;">
        <h2>Tu Código QR</h2>
        <img src="cid:qrcode" alt="QR Code" style="max-width: 300px;"/>
      </div>
      <p>Llega 5 minutos antes de tu horario y presenta el QR en la entrada. El código es de un solo uso.</p>
    </div>
  </body>
</html>"#,
        first_name = notice.first_name,
        date = format_date_es(notice.date),
        start = notice.start_time,
        end = notice.end_time,
    )
}

fn reservation_whatsapp_body(notice: &ReservationNotice) -> String {
    format!(
        "🎉 *¡Reserva Confirmada - Escape Room!*\n\nHola *{first_name}*,\n\nTu reserva ha sido confirmada exitosamente.\n\n📅 *Detalles de tu reserva:*\n• Fecha: {date}\n• Hora: {start} - {end}\n• Duración: 15 minutos\n\n📧 *Tu código QR ha sido enviado a:*\n{email}\n\n⚠️ *Importante:*\n• Revisa tu correo electrónico\n• Guarda el código QR que recibiste\n• Llega 5 minutos antes de tu horario\n• Presenta el QR en la entrada del evento\n• El código es de un solo uso\n\n¡Nos vemos pronto en el Escape Room! 🔐",
        first_name = notice.first_name,
        date = format_date_es(notice.date),
        start = notice.start_time,
        end = notice.end_time,
        email = notice.email,
    )
}
